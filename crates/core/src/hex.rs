use crate::Session;
use crate::view::{ROW_WIDTH, total_rows};

/// Screen column where the first hex cell starts (after `XXXXXXXX: `).
pub const HEX_COL: usize = 10;
/// Width of one hex cell including its trailing space.
pub const HEX_CELL: usize = 3;
/// Screen column where the ASCII gutter starts.
pub const ASCII_COL: usize = HEX_COL + ROW_WIDTH * HEX_CELL + 2;

/// Which pane the cursor is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hex,
    Ascii,
}

/// One file row as it appears on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRow {
    /// 8-digit upper-case offset of the first byte.
    pub offset: String,
    /// 16 cells; blank past end of file.
    pub hex: Vec<String>,
    /// 16 glyphs; `.` for non-printable, blank past end of file.
    pub ascii: String,
}

impl HexRow {
    /// Plain text rendering of the row using the pane column layout.
    pub fn text(&self) -> String {
        let hex: Vec<&str> = self.hex.iter().map(String::as_str).collect();
        format!("{}: {}   {}", self.offset, hex.join(" "), self.ascii)
    }
}

/// Location of the highlighted cell within [`Frame::rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCell {
    pub row: usize,
    pub col: usize,
    pub pane: Pane,
    /// A hex edit is half complete; the terminal cursor sits on the low nibble.
    pub pending: bool,
}

impl CursorCell {
    /// Screen column of the terminal cursor.
    pub fn screen_col(&self) -> usize {
        match self.pane {
            Pane::Hex => HEX_COL + self.col * HEX_CELL + usize::from(self.pending),
            Pane::Ascii => ASCII_COL + self.col,
        }
    }
}

/// Everything needed to paint one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: String,
    pub first_row: usize,
    pub rows: Vec<HexRow>,
    pub cursor: Option<CursorCell>,
    pub status: String,
    pub dirty: bool,
}

/// Compose the frame for `session` showing up to `visible_rows` rows
/// starting at its scroll row.
pub fn compose(session: &Session, visible_rows: usize) -> Frame {
    let buf = &session.buffer;
    let view = &session.view;
    let pending = session.edit.pending_nibble();
    let pane = if session.edit.mode().is_hex() {
        Pane::Hex
    } else {
        Pane::Ascii
    };

    let first_row = view.scroll_row();
    let last_row = (first_row + visible_rows).min(total_rows(buf.len()));
    let mut rows = Vec::new();
    for row in first_row..last_row {
        let start = row * ROW_WIDTH;
        let bytes = buf.row(row);
        let mut hex = Vec::with_capacity(ROW_WIDTH);
        let mut ascii = String::with_capacity(ROW_WIDTH);
        for i in 0..ROW_WIDTH {
            match bytes.get(i) {
                Some(&b) => {
                    let cell = match pending {
                        Some(high) if start + i == view.cursor() => {
                            format!("{:X}{:X}", high, b & 0x0F)
                        }
                        _ => format!("{b:02X}"),
                    };
                    hex.push(cell);
                    ascii.push(glyph(b));
                }
                None => {
                    hex.push("  ".into());
                    ascii.push(' ');
                }
            }
        }
        rows.push(HexRow {
            offset: format!("{start:08X}"),
            hex,
            ascii,
        });
    }

    let on_screen = (first_row..last_row).contains(&view.cursor_row());
    let cursor = if buf.is_empty() || !on_screen {
        None
    } else {
        Some(CursorCell {
            row: view.cursor_row() - first_row,
            col: view.cursor_col(),
            pane,
            pending: pending.is_some(),
        })
    };

    let path = buf
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[scratch]".into());
    let header = format!(" {} | F-size: {} bytes ", path, buf.len());
    let status = format!(
        " Mode: {}  Pos: {:08X} (dec: {})  {} ",
        session.edit.mode().label(),
        view.cursor(),
        view.cursor(),
        if buf.is_dirty() { "MODIFIED" } else { "CLEAN" }
    );

    Frame {
        header,
        first_row,
        rows,
        cursor,
        status,
        dirty: buf.is_dirty(),
    }
}

fn glyph(b: u8) -> char {
    if (0x20..=0x7E).contains(&b) {
        b as char
    } else {
        '.'
    }
}
