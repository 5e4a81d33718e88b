use std::io;
use std::sync::Once;

use anyhow::Result;
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use hexpad_core::Frame;
use hexpad_core::hex::{CursorCell, HexRow, Pane};
use ratatui::{
    Terminal,
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Header and status line.
const CHROME_ROWS: u16 = 2;

/// Text shown on the status line in place of the regular status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Drawn in the warning colours.
    pub alert: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alert: false,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alert: true,
        }
    }
}

/// Terminal user interface renderer.
pub struct Tui<B: Backend> {
    terminal: Terminal<B>,
    raw_mode: bool,
}

impl<B: Backend> Tui<B> {
    /// Create a new instance using the provided backend.
    /// Enables raw mode and switches to the alternate screen; both are
    /// undone when the `Tui` is dropped.
    pub fn new(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend)?;
        enable_raw_mode()?;
        let tui = Self {
            terminal,
            raw_mode: true,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(tui)
    }

    /// Create a TUI without touching the real terminal (for tests).
    pub fn with_backend(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            raw_mode: false,
        })
    }

    /// File rows that fit between the header and the status line.
    pub fn visible_rows(&self) -> usize {
        self.terminal
            .size()
            .map(|size| size.height.saturating_sub(CHROME_ROWS) as usize)
            .unwrap_or(0)
    }

    /// Draw the given frame. `notice` replaces the status line when set.
    pub fn draw(&mut self, frame: &Frame, notice: Option<&Notice>) -> Result<()> {
        self.terminal.draw(|f| {
            let size = f.area();
            let rows_height = size.height.saturating_sub(CHROME_ROWS);

            let header = Paragraph::new(frame.header.clone()).style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_widget(header, Rect::new(0, 0, size.width, size.height.min(1)));

            let lines: Vec<Line<'static>> = frame
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| row_line(row, frame.cursor.filter(|c| c.row == i)))
                .collect();
            f.render_widget(
                Paragraph::new(lines),
                Rect::new(0, size.height.min(1), size.width, rows_height),
            );

            if size.height >= CHROME_ROWS {
                let (text, style) = match notice {
                    Some(n) if n.alert => (n.text.clone(), dirty_style()),
                    Some(n) => (n.text.clone(), Style::default()),
                    None if frame.dirty => (frame.status.clone(), dirty_style()),
                    None => (frame.status.clone(), Style::default()),
                };
                f.render_widget(
                    Paragraph::new(text).style(style),
                    Rect::new(0, size.height - 1, size.width, 1),
                );
            }

            if let Some(cur) = frame.cursor {
                let x = cur.screen_col() as u16;
                let y = cur.row as u16 + 1;
                if x < size.width && y < size.height.saturating_sub(1) {
                    f.set_cursor_position((x, y));
                }
            }
        })?;
        Ok(())
    }

    /// Re-synchronise with the terminal after a failed draw, typically a
    /// resize racing the paint.
    pub fn resync(&mut self) {
        if let Err(err) = self.terminal.autoresize() {
            tracing::warn!(error = %err, "terminal resize failed");
        }
        if let Err(err) = self.terminal.clear() {
            tracing::warn!(error = %err, "terminal clear failed");
        }
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn restore(&mut self) {
        if self.raw_mode {
            let _ = self.terminal.show_cursor();
            reset_terminal();
            self.raw_mode = false;
        }
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Chain a panic hook that puts the terminal back before the default report.
///
/// With `panic = "abort"` the `Drop` guard on [`Tui`] never runs.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            reset_terminal();
            tracing::error!(?info, "panic");
            default_panic(info);
        }));
    });
}

fn reset_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

fn dirty_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

fn cursor_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    }
}

fn row_line(row: &HexRow, cursor: Option<CursorCell>) -> Line<'static> {
    let mut spans = Vec::with_capacity(row.hex.len() * 2 + 3);
    spans.push(Span::styled(
        format!("{}: ", row.offset),
        Style::default().add_modifier(Modifier::DIM),
    ));

    for (i, cell) in row.hex.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        match cursor {
            Some(c) if c.col == i => {
                spans.push(Span::styled(cell.clone(), cursor_style(c.pane == Pane::Hex)));
            }
            _ => spans.push(Span::raw(cell.clone())),
        }
    }
    spans.push(Span::raw("   "));

    for (i, ch) in row.ascii.chars().enumerate() {
        match cursor {
            Some(c) if c.col == i => {
                spans.push(Span::styled(ch.to_string(), cursor_style(c.pane == Pane::Ascii)));
            }
            _ => spans.push(Span::raw(ch.to_string())),
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexpad_core::{ByteBuffer, Key, Session, compose_frame};
    use ratatui::backend::TestBackend;

    fn line(tui: &Tui<TestBackend>, y: u16) -> String {
        let buffer = tui.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn draws_header_rows_and_status() {
        let mut tui = Tui::with_backend(TestBackend::new(80, 4)).unwrap();
        let session = Session::new(ByteBuffer::from_bytes(b"Hi!\x00".to_vec()));
        let frame = compose_frame(&session, tui.visible_rows());
        tui.draw(&frame, None).unwrap();

        assert!(line(&tui, 0).starts_with(" [scratch] | F-size: 4 bytes"));
        assert!(line(&tui, 1).starts_with("00000000: 48 69 21 00"));
        assert_eq!(&line(&tui, 1)[60..64], "Hi!.");
        assert!(line(&tui, 3).starts_with(" Mode: HEX  Pos: 00000000 (dec: 0)  CLEAN"));

        let cursor = tui.backend_mut().get_cursor_position().unwrap();
        assert_eq!(cursor, (10, 1).into());
    }

    #[test]
    fn cursor_follows_pending_nibble_and_ascii_pane() {
        let mut tui = Tui::with_backend(TestBackend::new(80, 4)).unwrap();
        let mut session = Session::new(ByteBuffer::from_bytes(vec![0; 4]));
        session.handle_key(Key::Char('a'), 2);
        tui.draw(&compose_frame(&session, 2), None).unwrap();
        assert!(line(&tui, 1).starts_with("00000000: A0 00"));
        assert_eq!(tui.backend_mut().get_cursor_position().unwrap(), (11, 1).into());

        session.handle_key(Key::Tab, 2);
        tui.draw(&compose_frame(&session, 2), None).unwrap();
        assert_eq!(tui.backend_mut().get_cursor_position().unwrap(), (60, 1).into());
    }

    #[test]
    fn notice_replaces_status() {
        let mut tui = Tui::with_backend(TestBackend::new(80, 3)).unwrap();
        let session = Session::new(ByteBuffer::from_bytes(vec![0; 4]));
        let frame = compose_frame(&session, 1);
        tui.draw(&frame, Some(&Notice::alert(" Quit anyway? (y/N) ")))
            .unwrap();
        assert!(line(&tui, 2).starts_with(" Quit anyway? (y/N)"));
    }

    #[test]
    fn panic_hook_installs_once_and_still_unwinds() {
        install_panic_hook();
        install_panic_hook();
        let result = std::panic::catch_unwind(|| panic!("boom"));
        assert!(result.is_err());
    }

    #[test]
    fn visible_rows_excludes_chrome() {
        let tui = Tui::with_backend(TestBackend::new(80, 10)).unwrap();
        assert_eq!(tui.visible_rows(), 8);
        let tiny = Tui::with_backend(TestBackend::new(80, 1)).unwrap();
        assert_eq!(tiny.visible_rows(), 0);
    }
}
