use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    NextPage, // Jump to the start of the next page
    PrevPage, // Jump to the start of the previous page
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Line scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,

        // Page scrolling
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::PageDown, _) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,

        // Jump to top/bottom
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::JumpToBottom,
        (KeyCode::Char('G'), KeyModifiers::NONE) => Action::JumpToBottom,
        (KeyCode::End, _) => Action::JumpToBottom,

        // Page jumps
        (KeyCode::Char(']'), KeyModifiers::NONE) => Action::NextPage,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NextPage,
        (KeyCode::Char('['), KeyModifiers::NONE) => Action::PrevPage,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::PrevPage,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Action::ScrollDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Action::ScrollHalfPageDown
        );
        assert_eq!(
            handle_key_event(key(KeyCode::PageUp, KeyModifiers::NONE)),
            Action::ScrollPageUp
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::JumpToBottom
        );
    }

    #[test]
    fn test_page_jump_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char(']'), KeyModifiers::NONE)),
            Action::NextPage
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('p'), KeyModifiers::NONE)),
            Action::PrevPage
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE)),
            Action::None
        );
    }
}
