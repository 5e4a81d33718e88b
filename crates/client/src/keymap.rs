use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use hexpad_core::Key;

/// Translate a crossterm [`KeyEvent`] into an editor [`Key`].
pub fn map_key_event(ev: KeyEvent) -> Key {
    let ctrl = ev.modifiers.contains(KeyModifiers::CONTROL);
    let alt = ev.modifiers.contains(KeyModifiers::ALT);
    match ev.code {
        KeyCode::Char(c) if ctrl && !alt => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(_) if ctrl || alt => Key::Other,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Tab => Key::Tab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => Key::Other,
    }
}

/// Translate a terminal [`Event`].
///
/// Returns `None` for events the editor ignores: key releases, mouse,
/// focus and paste.
pub fn map_event(ev: Event) -> Option<Key> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key) => Some(map_key_event(key)),
        Event::Resize(_, _) => Some(Key::Resize),
        _ => None,
    }
}
