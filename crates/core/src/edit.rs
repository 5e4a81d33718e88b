use crate::ByteBuffer;
use crate::view::ViewState;

/// Active pane, with the hex pane carrying its half-typed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Hex pane. `pending` is the high nibble typed so far.
    Hex { pending: Option<u8> },
    /// ASCII pane.
    Ascii,
}

impl Default for EditMode {
    fn default() -> Self {
        EditMode::Hex { pending: None }
    }
}

impl EditMode {
    /// True in the hex pane.
    pub fn is_hex(&self) -> bool {
        matches!(self, EditMode::Hex { .. })
    }

    /// Upper-case name shown on the status line.
    pub fn label(&self) -> &'static str {
        match self {
            EditMode::Hex { .. } => "HEX",
            EditMode::Ascii => "ASCII",
        }
    }
}

/// Result of feeding one character to the edit state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A byte was written and the cursor advanced.
    Written,
    /// First hex nibble stored; no byte written yet.
    Pending,
    /// The character is not accepted in the current mode.
    Ignored,
}

/// Edit mode plus nibble buffering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    mode: EditMode,
}

impl EditSession {
    /// Start in hex mode with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode, including any pending nibble.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The pending high nibble, if a hex edit is half complete.
    pub fn pending_nibble(&self) -> Option<u8> {
        match self.mode {
            EditMode::Hex { pending } => pending,
            EditMode::Ascii => None,
        }
    }

    /// Switch between hex and ASCII. Any pending nibble is dropped.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            EditMode::Hex { .. } => EditMode::Ascii,
            EditMode::Ascii => EditMode::Hex { pending: None },
        };
    }

    /// Drop a half-typed hex byte. The mode is kept.
    pub fn clear_pending(&mut self) {
        if let EditMode::Hex { pending } = &mut self.mode {
            *pending = None;
        }
    }

    /// Whether `ch` would be consumed in the current mode.
    pub fn accepts(&self, ch: char) -> bool {
        match self.mode {
            EditMode::Hex { .. } => ch.is_ascii_hexdigit(),
            EditMode::Ascii => is_printable(ch),
        }
    }

    /// Feed one typed character at the cursor.
    ///
    /// Completed edits overwrite the byte under the cursor and advance it by
    /// one, stopping at the last byte.
    pub fn apply_char(
        &mut self,
        ch: char,
        buf: &mut ByteBuffer,
        view: &mut ViewState,
    ) -> EditOutcome {
        if buf.is_empty() || !self.accepts(ch) {
            return EditOutcome::Ignored;
        }
        let value = match &mut self.mode {
            EditMode::Hex { pending } => {
                // accepts() guarantees a hex digit
                let Some(low) = ch.to_digit(16) else {
                    return EditOutcome::Ignored;
                };
                match pending.take() {
                    None => {
                        *pending = Some(low as u8);
                        return EditOutcome::Pending;
                    }
                    Some(high) => (high << 4) | low as u8,
                }
            }
            EditMode::Ascii => ch as u8,
        };
        buf.set_byte(view.cursor(), value);
        view.move_by(1, buf.len());
        EditOutcome::Written
    }
}

fn is_printable(ch: char) -> bool {
    (' '..='~').contains(&ch)
}
