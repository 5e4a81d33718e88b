//! Editing core for hexpad: byte buffer, cursor model, nibble edit state
//! machine and the key interpreter tying them together.

pub mod buffer;
pub mod edit;
pub mod error;
pub mod fs;
pub mod hex;
pub mod input;
pub mod session;
pub mod view;

pub use buffer::ByteBuffer;
pub use edit::{EditMode, EditOutcome, EditSession};
pub use error::{Error, Result};
pub use hex::{Frame, compose as compose_frame};
pub use input::{Command, Key, KeySource};
pub use session::Session;
pub use view::{Motion, ROW_WIDTH, ViewState};
