// Cursor and scroll model for the fixed 16-byte row layout.

/// Bytes per display row.
pub const ROW_WIDTH: usize = 16;

/// Cursor movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    /// First byte of the cursor's row.
    RowStart,
    /// Last byte of the cursor's row.
    RowEnd,
}

/// Cursor index and first visible row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    cursor: usize,
    scroll_row: usize,
}

impl ViewState {
    /// Cursor at offset 0, scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte index under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// First row on screen.
    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    /// Row holding the cursor.
    pub fn cursor_row(&self) -> usize {
        self.cursor / ROW_WIDTH
    }

    /// Column of the cursor within its row.
    pub fn cursor_col(&self) -> usize {
        self.cursor % ROW_WIDTH
    }

    /// Move by `delta` bytes, clamped to `[0, size-1]`.
    ///
    /// Returns `true` if the cursor actually changed. Always `false` for an
    /// empty buffer.
    pub fn move_by(&mut self, delta: isize, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        let target = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta.unsigned_abs())
        };
        self.move_to(target, size)
    }

    /// Jump to `index`, clamped to `[0, size-1]`. Returns whether the cursor changed.
    pub fn move_to(&mut self, index: usize, size: usize) -> bool {
        if size == 0 {
            return false;
        }
        let new = index.min(size - 1);
        let changed = new != self.cursor;
        self.cursor = new;
        changed
    }

    /// Apply a [`Motion`]. Page motions step by `visible_rows` rows.
    pub fn apply(&mut self, motion: Motion, size: usize, visible_rows: usize) -> bool {
        let page = (visible_rows.max(1) * ROW_WIDTH) as isize;
        match motion {
            Motion::Left => self.move_by(-1, size),
            Motion::Right => self.move_by(1, size),
            Motion::Up => self.move_by(-(ROW_WIDTH as isize), size),
            Motion::Down => self.move_by(ROW_WIDTH as isize, size),
            Motion::PageUp => self.move_by(-page, size),
            Motion::PageDown => self.move_by(page, size),
            Motion::RowStart => self.move_to(self.cursor_row() * ROW_WIDTH, size),
            Motion::RowEnd => self.move_to(self.cursor_row() * ROW_WIDTH + ROW_WIDTH - 1, size),
        }
    }

    /// Bring `scroll_row` into range, then scroll so the cursor row is visible.
    ///
    /// The range clamp runs first so following the cursor never leaves
    /// `scroll_row` outside `[0, max(0, total_rows - visible_rows)]`.
    pub fn reconcile_scroll(&mut self, size: usize, visible_rows: usize) {
        let visible_rows = visible_rows.max(1);
        let max_scroll = total_rows(size).saturating_sub(visible_rows);
        self.scroll_row = self.scroll_row.min(max_scroll);

        let cursor_row = self.cursor_row();
        if cursor_row < self.scroll_row {
            self.scroll_row = cursor_row;
        } else if cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = cursor_row + 1 - visible_rows;
        }
    }
}

/// Number of display rows needed for `size` bytes.
pub fn total_rows(size: usize) -> usize {
    size.div_ceil(ROW_WIDTH)
}
