//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::AppState;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_help {
        // Any key dismisses the overlay; quit keys still quit.
        state.show_help = false;
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        KeyCode::Char(' ') => {
            state.paused = !state.paused;
            KeyAction::None
        }

        // Scene history navigation.
        KeyCode::Left => {
            state.rewind();
            KeyAction::None
        }
        KeyCode::Right => {
            state.advance();
            KeyAction::None
        }
        KeyCode::End | KeyCode::Char('g') => {
            state.latest();
            KeyAction::None
        }

        KeyCode::Char('h') | KeyCode::Char('?') => {
            state.show_help = true;
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}
