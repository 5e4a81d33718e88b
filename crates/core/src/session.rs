use std::io;
use std::path::Path;

use crate::edit::EditSession;
use crate::input::{Command, Key, KeySource, interpret};
use crate::view::ViewState;
use crate::{ByteBuffer, Error, Result};

/// Everything one editing session owns.
#[derive(Debug, Clone)]
pub struct Session {
    pub buffer: ByteBuffer,
    pub view: ViewState,
    pub edit: EditSession,
}

impl Session {
    /// Start a session over `buffer` with the cursor at offset 0 in hex mode.
    pub fn new(buffer: ByteBuffer) -> Self {
        Self {
            buffer,
            view: ViewState::new(),
            edit: EditSession::new(),
        }
    }

    /// Load `path`; a failed load yields an empty session plus the error.
    pub fn load<P: AsRef<Path>>(path: P) -> (Self, Option<Error>) {
        let (buffer, err) = ByteBuffer::load(path);
        (Self::new(buffer), err)
    }

    /// Interpret one key press.
    pub fn handle_key(&mut self, key: Key, visible_rows: usize) -> Command {
        let command = interpret(self, key, visible_rows);
        tracing::debug!(?key, ?command, cursor = self.view.cursor(), "key handled");
        command
    }

    /// Save the buffer. Pending hex input is discarded either way.
    pub fn save(&mut self) -> Result<()> {
        self.edit.clear_pending();
        self.buffer.save().inspect_err(|err| {
            tracing::warn!(error = %err, "save failed, buffer stays dirty");
        })
    }

    /// Decide whether a quit request may proceed.
    ///
    /// A clean buffer quits straight away. A dirty one blocks on `keys` for a
    /// single answer; only `y`/`Y` confirms.
    pub fn confirm_quit<K: KeySource>(&self, keys: &mut K) -> io::Result<bool> {
        if !self.buffer.is_dirty() {
            return Ok(true);
        }
        let answer = keys.wait_key()?;
        Ok(matches!(answer, Key::Char('y' | 'Y')))
    }
}
