//! Key model and the key → command interpreter.

use std::io;
use std::time::Duration;

use crate::Session;
use crate::edit::EditOutcome;
use crate::view::Motion;

/// Save shortcut (Ctrl+W).
pub const SAVE_KEY: Key = Key::Ctrl('w');
/// Quit shortcut (Ctrl+X).
pub const QUIT_KEY: Key = Key::Ctrl('x');

/// Terminal-independent key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A typed character without Ctrl or Alt.
    Char(char),
    /// Ctrl plus a letter, lower-cased.
    Ctrl(char),
    Tab,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// The terminal was resized.
    Resize,
    /// Anything the editor has no binding for.
    Other,
}

impl Key {
    fn motion(self) -> Option<Motion> {
        match self {
            Key::Left => Some(Motion::Left),
            Key::Right => Some(Motion::Right),
            Key::Up => Some(Motion::Up),
            Key::Down => Some(Motion::Down),
            Key::PageUp => Some(Motion::PageUp),
            Key::PageDown => Some(Motion::PageDown),
            Key::Home => Some(Motion::RowStart),
            Key::End => Some(Motion::RowEnd),
            _ => None,
        }
    }
}

/// Semantic result of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Save,
    ModeChange,
    /// A byte was overwritten.
    Edit,
    /// First hex nibble entered.
    HalfEdit,
    /// The cursor moved.
    Move,
    NoOp,
}

/// Source of key presses for the editor loop.
pub trait KeySource {
    /// Wait up to `timeout` for a key. `Ok(None)` means the timeout expired.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;

    /// Block until a key arrives.
    fn wait_key(&mut self) -> io::Result<Key>;
}

/// Classify `key` and apply it to `session`.
///
/// Control keys win over the mode toggle, which wins over character edits,
/// which win over movement. An empty buffer only reacts to quit keys.
pub fn interpret(session: &mut Session, key: Key, visible_rows: usize) -> Command {
    if session.buffer.is_empty() {
        return match key {
            QUIT_KEY | Key::Ctrl('q') | Key::Char('q') => Command::Quit,
            _ => Command::NoOp,
        };
    }

    match key {
        SAVE_KEY => {
            session.edit.clear_pending();
            return Command::Save;
        }
        QUIT_KEY => {
            session.edit.clear_pending();
            return Command::Quit;
        }
        Key::Tab => {
            session.edit.toggle_mode();
            return Command::ModeChange;
        }
        _ => {}
    }

    if let Key::Char(ch) = key {
        let Session { buffer, view, edit } = session;
        return match edit.apply_char(ch, buffer, view) {
            EditOutcome::Written => Command::Edit,
            EditOutcome::Pending => Command::HalfEdit,
            EditOutcome::Ignored => Command::NoOp,
        };
    }

    match key.motion() {
        Some(motion) => {
            session.edit.clear_pending();
            if session.view.apply(motion, session.buffer.len(), visible_rows) {
                Command::Move
            } else {
                Command::NoOp
            }
        }
        None => Command::NoOp,
    }
}
