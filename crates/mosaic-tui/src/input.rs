use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mosaic_core::selection::NavKey;

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    // Grid focus
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    JumpToFirst,
    JumpToLast,
    /// Open the lightbox on the focused tile
    Open,
    // Lightbox
    Close,
    Next,
    Previous,
    /// Arrow keys / Escape, routed through the engine's keyboard adapter
    Viewer(NavKey),
    /// Open the call-to-action link in the browser
    OpenAction,
    /// Open the n-th document link (0-based) in the browser
    OpenDocument(usize),
    /// Switch between the dark and light palettes
    ToggleTheme,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, viewer_open: bool, keymap: &Keymap) -> Action {
    if viewer_open {
        handle_viewer_mode(key, keymap)
    } else {
        handle_grid_mode(key, keymap)
    }
}

fn handle_grid_mode(key: KeyEvent, keymap: &Keymap) -> Action {
    let action = match (key.code, key.modifiers) {
        (KeyCode::Left, KeyModifiers::NONE) => Action::FocusLeft,
        (KeyCode::Right, KeyModifiers::NONE) => Action::FocusRight,
        (KeyCode::Up, KeyModifiers::NONE) => Action::FocusUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::FocusDown,
        (KeyCode::Esc, _) => Action::None,
        _ => lookup(key, keymap),
    };

    match action {
        // Lightbox-only actions do nothing on the grid
        Action::Close | Action::Next | Action::Previous | Action::OpenAction => Action::None,
        other => other,
    }
}

fn handle_viewer_mode(key: KeyEvent, keymap: &Keymap) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Left, KeyModifiers::NONE) => return Action::Viewer(NavKey::ArrowLeft),
        (KeyCode::Right, KeyModifiers::NONE) => return Action::Viewer(NavKey::ArrowRight),
        (KeyCode::Esc, _) => return Action::Viewer(NavKey::Escape),
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            return Action::OpenDocument(c as usize - '1' as usize);
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        _ => {}
    }

    match lookup(key, keymap) {
        // The quit key leaves the lightbox first
        Action::Quit => Action::Close,
        Action::FocusLeft => Action::Previous,
        Action::FocusRight => Action::Next,
        Action::Open
        | Action::FocusUp
        | Action::FocusDown
        | Action::JumpToFirst
        | Action::JumpToLast => Action::None,
        other => other,
    }
}

fn lookup(key: KeyEvent, keymap: &Keymap) -> Action {
    keymap
        .get(&KeyBinding::new(key.code, key.modifiers))
        .copied()
        .unwrap_or(Action::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_grid_mode() {
        let keymap = Keymap::default();
        assert_eq!(handle_key_event(key(KeyCode::Char('j')), false, &keymap), Action::FocusDown);
        assert_eq!(handle_key_event(key(KeyCode::Left), false, &keymap), Action::FocusLeft);
        assert_eq!(handle_key_event(key(KeyCode::Enter), false, &keymap), Action::Open);
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), false, &keymap), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc), false, &keymap), Action::None);
        assert_eq!(handle_key_event(key(KeyCode::Char('n')), false, &keymap), Action::None);
    }

    #[test]
    fn test_viewer_mode_routes_arrows_to_engine() {
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Right), true, &keymap),
            Action::Viewer(NavKey::ArrowRight)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Left), true, &keymap),
            Action::Viewer(NavKey::ArrowLeft)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), true, &keymap),
            Action::Viewer(NavKey::Escape)
        );
    }

    #[test]
    fn test_viewer_mode_bindings() {
        let keymap = Keymap::default();
        assert_eq!(handle_key_event(key(KeyCode::Char('n')), true, &keymap), Action::Next);
        assert_eq!(handle_key_event(key(KeyCode::Char('h')), true, &keymap), Action::Previous);
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), true, &keymap), Action::Close);
        assert_eq!(handle_key_event(key(KeyCode::Char('o')), true, &keymap), Action::OpenAction);
        assert_eq!(handle_key_event(key(KeyCode::Char('2')), true, &keymap), Action::OpenDocument(1));
        assert_eq!(handle_key_event(key(KeyCode::Enter), true, &keymap), Action::None);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), true, &keymap),
            Action::Quit
        );
    }
}
