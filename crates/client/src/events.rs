use std::io;
use std::time::Duration;

use crossterm::event;
use hexpad_core::{Key, KeySource};

use crate::keymap::map_event;

/// Key source reading from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(event::read()?))
    }

    // Resizes are not answers; keep waiting for an actual key press.
    fn wait_key(&mut self) -> io::Result<Key> {
        loop {
            match map_event(event::read()?) {
                Some(Key::Resize) | None => continue,
                Some(key) => return Ok(key),
            }
        }
    }
}
