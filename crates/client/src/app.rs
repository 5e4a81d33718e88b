//! Editor event loop.

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use hexpad_core::{Command, Key, KeySource, Session, compose_frame};
use ratatui::backend::{Backend, CrosstermBackend};

use crate::events::TerminalKeys;
use crate::tui::{Notice, Tui, install_panic_hook};

const QUIT_PROMPT: &str = " WARNING: Unsaved changes! Quit anyway? (y/N) ";

/// Runtime settings for the editor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long one input poll waits before the loop comes round again.
    pub poll_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(100),
        }
    }
}

/// Session plus what the status line is currently saying.
pub struct App {
    session: Session,
    notice: Option<Notice>,
    config: Config,
}

impl App {
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session,
            notice: None,
            config,
        }
    }

    /// Load `path` into a new app. A failed load is shown on the status line.
    pub fn open(path: &Path, config: Config) -> Self {
        let (session, err) = Session::load(path);
        let mut app = Self::new(session, config);
        if let Some(err) = err {
            app.notice = Some(Notice::alert(format!(" Load failed: {err} ")));
        }
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Run until the user quits. I/O failures reading input are fatal.
    pub fn run<B: Backend, K: KeySource>(
        &mut self,
        tui: &mut Tui<B>,
        keys: &mut K,
    ) -> Result<()> {
        self.render(tui);
        loop {
            let key = keys
                .poll_key(self.config.poll_timeout)
                .context("reading terminal input")?;
            let Some(key) = key else {
                continue;
            };
            if self.step(key, tui, keys)? {
                tracing::info!("quitting");
                return Ok(());
            }
            self.render(tui);
        }
    }

    /// Process one key. Returns `true` when the editor should exit.
    pub fn step<B: Backend, K: KeySource>(
        &mut self,
        key: Key,
        tui: &mut Tui<B>,
        keys: &mut K,
    ) -> Result<bool> {
        let command = self.session.handle_key(key, tui.visible_rows());
        match command {
            Command::Quit => {
                if self.session.buffer.is_dirty() {
                    self.notice = Some(Notice::alert(QUIT_PROMPT));
                    self.render(tui);
                }
                let confirmed = self
                    .session
                    .confirm_quit(keys)
                    .context("reading quit confirmation")?;
                self.notice = None;
                return Ok(confirmed);
            }
            Command::Save => {
                self.notice = Some(match self.session.save() {
                    Ok(()) => {
                        Notice::info(format!(" Saved {} bytes ", self.session.buffer.len()))
                    }
                    Err(err) => Notice::alert(format!(" Save failed: {err} ")),
                });
            }
            Command::Edit | Command::HalfEdit | Command::Move | Command::ModeChange => {
                self.notice = None;
            }
            Command::NoOp => {}
        }
        Ok(false)
    }

    /// Scroll to the cursor and repaint. Draw failures are not fatal.
    pub fn render<B: Backend>(&mut self, tui: &mut Tui<B>) {
        let visible = tui.visible_rows();
        self.session
            .view
            .reconcile_scroll(self.session.buffer.len(), visible);
        let frame = compose_frame(&self.session, visible);
        if let Err(err) = tui.draw(&frame, self.notice.as_ref()) {
            tracing::error!(error = %err, "draw failed, resynchronising terminal");
            tui.resync();
        }
    }
}

/// Open `path` in the terminal and edit it until the user quits.
///
/// The terminal is restored before any error is returned.
pub fn run(path: &Path, config: Config) -> Result<()> {
    let mut app = App::open(path, config);
    install_panic_hook();
    let mut tui =
        Tui::new(CrosstermBackend::new(io::stdout())).context("initialising terminal")?;
    let result = app.run(&mut tui, &mut TerminalKeys);
    tui.restore();
    result
}
