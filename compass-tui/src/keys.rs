//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    ToggleExpand,
    ExpandAll,
    CollapseAll,
    OpenSearch,
    CycleDivision,
    Refresh,
    DrillDown,
    DrillUp,
    Cancel,
}

/// Map a key press in normal mode. Search mode bypasses this and feeds the
/// text area directly.
pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('v') => Some(Action::CycleDivision),
        KeyCode::Char('E') => Some(Action::ExpandAll),
        KeyCode::Char('C') => Some(Action::CollapseAll),
        KeyCode::Char('x') | KeyCode::Char(' ') => Some(Action::ToggleExpand),
        KeyCode::Enter => Some(Action::DrillDown),
        KeyCode::Backspace => Some(Action::DrillUp),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c @ '1'..='9') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}

/// What a key does while the search box is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Apply,
    Cancel,
    Edit,
}

pub fn map_search_key(event: KeyEvent) -> SearchKey {
    match event.code {
        KeyCode::Enter => SearchKey::Apply,
        KeyCode::Esc => SearchKey::Cancel,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => SearchKey::Cancel,
        _ => SearchKey::Edit,
    }
}
