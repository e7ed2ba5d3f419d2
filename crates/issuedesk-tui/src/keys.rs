use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Up,
    Down,
    Enter,
    Tab,
    BackTab,
    Escape,
    Backspace,
    NewIssue,
    FocusSearch,
    Char(char),
    Noop,
}

pub fn parse_key_action(key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('n') if ctrl => KeyAction::NewIssue,
        // Terminals report Ctrl-/ as Ctrl-/, Ctrl-7 or Ctrl-_ depending on protocol
        KeyCode::Char('/') | KeyCode::Char('7') | KeyCode::Char('_') if ctrl => {
            KeyAction::FocusSearch
        }
        KeyCode::Up => KeyAction::Up,
        KeyCode::Down => KeyAction::Down,
        KeyCode::Enter => KeyAction::Enter,
        KeyCode::Tab => KeyAction::Tab,
        KeyCode::BackTab => KeyAction::BackTab,
        KeyCode::Esc => KeyAction::Escape,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Char(c) if !ctrl => KeyAction::Char(c),
        _ => KeyAction::Noop,
    }
}
