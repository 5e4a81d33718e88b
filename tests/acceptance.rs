use hexpad_core::input::{QUIT_KEY, SAVE_KEY};
use hexpad_core::{Command, Key, KeySource, Session};
use std::io;
use std::time::Duration;
use tempfile::tempdir;

struct Answer(Option<Key>);

impl KeySource for Answer {
    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
        Ok(None)
    }

    fn wait_key(&mut self) -> io::Result<Key> {
        self.0
            .take()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

#[test]
fn edit_hex_then_ascii_then_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("three.bin");
    std::fs::write(&path, [0x00, 0x00, 0x00]).unwrap();
    let (mut s, err) = Session::load(&path);
    assert!(err.is_none());

    assert_eq!(s.handle_key(Key::Char('4'), 10), Command::HalfEdit);
    assert_eq!(s.handle_key(Key::Char('1'), 10), Command::Edit);
    assert_eq!(s.buffer.get(0), Some(0x41));
    assert_eq!(s.view.cursor(), 1);
    assert!(s.buffer.is_dirty());

    assert_eq!(s.handle_key(Key::Tab, 10), Command::ModeChange);
    assert_eq!(s.handle_key(Key::Char('B'), 10), Command::Edit);
    assert_eq!(s.buffer.get(1), Some(0x42));
    assert_eq!(s.view.cursor(), 2);

    assert_eq!(s.handle_key(SAVE_KEY, 10), Command::Save);
    s.save().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![0x41, 0x42, 0x00]);
    assert!(!s.buffer.is_dirty());
}

#[test]
fn quit_on_dirty_buffer_needs_confirmation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dirty.bin");
    std::fs::write(&path, [0u8; 8]).unwrap();
    let (mut s, _) = Session::load(&path);
    s.handle_key(Key::Char('7'), 10);
    s.handle_key(Key::Char('7'), 10);
    let snapshot = s.buffer.bytes().to_vec();
    let cursor = s.view.cursor();

    assert_eq!(s.handle_key(QUIT_KEY, 10), Command::Quit);
    assert!(!s.confirm_quit(&mut Answer(Some(Key::Char('n')))).unwrap());
    assert_eq!(s.buffer.bytes(), snapshot.as_slice());
    assert_eq!(s.view.cursor(), cursor);
    assert!(s.buffer.is_dirty());

    // editing carries on after a cancelled quit
    assert_eq!(s.handle_key(Key::Right, 10), Command::Move);

    assert_eq!(s.handle_key(QUIT_KEY, 10), Command::Quit);
    assert!(s.confirm_quit(&mut Answer(Some(Key::Char('y')))).unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 8]);
}

#[test]
fn unreadable_path_gives_empty_session_that_never_saves() {
    let dir = tempdir().unwrap();
    let (mut s, err) = Session::load(dir.path());
    assert!(err.is_some());
    assert!(s.buffer.is_empty());
    for key in [Key::Char('0'), Key::Char('0'), Key::Tab, Key::Right, SAVE_KEY] {
        assert_eq!(s.handle_key(key, 10), Command::NoOp);
    }
    assert_eq!(s.handle_key(QUIT_KEY, 10), Command::Quit);
    assert!(s.confirm_quit(&mut Answer(None)).unwrap());
}
