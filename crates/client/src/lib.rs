pub mod app;
pub mod events;
pub mod keymap;
pub mod tui;

pub use app::{App, Config, run};
