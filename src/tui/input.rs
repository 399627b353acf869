use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move the card selection
    Left,
    Right,
    Up,
    Down,
    /// Open the selected card in the viewer
    Open,
    /// Download the selected (or open) item
    Download,
    /// Start editing the search query
    FocusSearch,
    /// Cycle the category filter forward or backward
    NextFilter,
    PreviousFilter,
    ToggleSort,
    /// Toggle help overlay
    Help,
    /// Close the viewer overlay
    CloseViewer,
    /// Hand the open item to the external player
    Play,
    /// Append a character to the query
    SearchInput(char),
    SearchBackspace,
    /// Leave the search box
    SearchDone,
    /// No action
    None,
}

fn is_plain(modifiers: KeyModifiers) -> bool {
    modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT
}

/// Maps keyboard events to actions while browsing the grid
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return KeyAction::Quit;
    }
    if !is_plain(key.modifiers) {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        KeyCode::Left | KeyCode::Char('h') => KeyAction::Left,
        KeyCode::Right | KeyCode::Char('l') => KeyAction::Right,
        KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,

        KeyCode::Enter => KeyAction::Open,
        KeyCode::Char('d') => KeyAction::Download,

        KeyCode::Char('/') => KeyAction::FocusSearch,
        KeyCode::Char('f') => KeyAction::NextFilter,
        KeyCode::Char('F') => KeyAction::PreviousFilter,
        KeyCode::Char('s') => KeyAction::ToggleSort,

        KeyCode::Char('?') => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events while the viewer overlay is open
pub fn handle_viewer_input(key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return KeyAction::Quit;
    }
    if !is_plain(key.modifiers) {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => KeyAction::CloseViewer,
        KeyCode::Char('d') => KeyAction::Download,
        KeyCode::Enter | KeyCode::Char('p') => KeyAction::Play,
        KeyCode::Char('?') => KeyAction::Help,
        _ => KeyAction::None,
    }
}

/// Maps keyboard events while the search box has focus
pub fn handle_search_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Enter, _) | (KeyCode::Esc, _) => KeyAction::SearchDone,
        (KeyCode::Backspace, _) => KeyAction::SearchBackspace,
        (KeyCode::Char(c), modifiers) if is_plain(modifiers) => KeyAction::SearchInput(c),
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_quit() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c), KeyAction::Quit);
        assert_eq!(handle_viewer_input(ctrl_c), KeyAction::Quit);
        assert_eq!(handle_search_input(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_key_navigation() {
        assert_eq!(handle_key_event(key(KeyCode::Left)), KeyAction::Left);
        assert_eq!(handle_key_event(key(KeyCode::Char('h'))), KeyAction::Left);
        assert_eq!(handle_key_event(key(KeyCode::Right)), KeyAction::Right);
        assert_eq!(handle_key_event(key(KeyCode::Char('l'))), KeyAction::Right);
        assert_eq!(handle_key_event(key(KeyCode::Up)), KeyAction::Up);
        assert_eq!(handle_key_event(key(KeyCode::Char('k'))), KeyAction::Up);
        assert_eq!(handle_key_event(key(KeyCode::Down)), KeyAction::Down);
        assert_eq!(handle_key_event(key(KeyCode::Char('j'))), KeyAction::Down);
    }

    #[test]
    fn test_key_filters_and_sort() {
        assert_eq!(handle_key_event(key(KeyCode::Char('/'))), KeyAction::FocusSearch);
        assert_eq!(handle_key_event(key(KeyCode::Char('f'))), KeyAction::NextFilter);
        assert_eq!(handle_key_event(key(KeyCode::Char('s'))), KeyAction::ToggleSort);

        let shift_f = KeyEvent::new(KeyCode::Char('F'), KeyModifiers::SHIFT);
        assert_eq!(handle_key_event(shift_f), KeyAction::PreviousFilter);
    }

    #[test]
    fn test_key_open_download_help() {
        assert_eq!(handle_key_event(key(KeyCode::Enter)), KeyAction::Open);
        assert_eq!(handle_key_event(key(KeyCode::Char('d'))), KeyAction::Download);
        assert_eq!(handle_key_event(key(KeyCode::Char('?'))), KeyAction::Help);
    }

    #[test]
    fn test_key_none() {
        assert_eq!(handle_key_event(key(KeyCode::Char('z'))), KeyAction::None);
        let alt_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT);
        assert_eq!(handle_key_event(alt_q), KeyAction::None);
    }

    #[test]
    fn test_viewer_keys() {
        assert_eq!(handle_viewer_input(key(KeyCode::Esc)), KeyAction::CloseViewer);
        assert_eq!(handle_viewer_input(key(KeyCode::Char('q'))), KeyAction::CloseViewer);
        assert_eq!(handle_viewer_input(key(KeyCode::Char('x'))), KeyAction::CloseViewer);
        assert_eq!(handle_viewer_input(key(KeyCode::Char('d'))), KeyAction::Download);
        assert_eq!(handle_viewer_input(key(KeyCode::Enter)), KeyAction::Play);
        assert_eq!(handle_viewer_input(key(KeyCode::Char('p'))), KeyAction::Play);
        assert_eq!(handle_viewer_input(key(KeyCode::Left)), KeyAction::None);
    }

    #[test]
    fn test_search_keys() {
        assert_eq!(
            handle_search_input(key(KeyCode::Char('q'))),
            KeyAction::SearchInput('q')
        );
        assert_eq!(
            handle_search_input(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT)),
            KeyAction::SearchInput('C')
        );
        assert_eq!(
            handle_search_input(key(KeyCode::Backspace)),
            KeyAction::SearchBackspace
        );
        assert_eq!(handle_search_input(key(KeyCode::Enter)), KeyAction::SearchDone);
        assert_eq!(handle_search_input(key(KeyCode::Esc)), KeyAction::SearchDone);
    }
}
