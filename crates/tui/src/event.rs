//! Event handling for the TUI.
//!
//! Provides keyboard and mouse event polling and key matchers.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;

use crate::TuiResult;

/// A user input the app reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// Poll for keyboard or mouse input with a timeout.
///
/// Returns `None` if nothing arrived within the timeout. Other terminal
/// events (focus, resize, paste) are consumed and ignored; the next draw
/// picks up a new size anyway.
pub fn poll_input(timeout: Duration) -> TuiResult<Option<Input>> {
    if event::poll(timeout)? {
        return Ok(match event::read()? {
            Event::Key(key) => Some(Input::Key(key)),
            Event::Mouse(mouse) => Some(Input::Mouse(mouse)),
            _ => None,
        });
    }
    Ok(None)
}

/// Check if the key event represents a quit command.
///
/// Returns `true` for 'q' key or Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    )
}

/// Check if the key event is the Tab key.
pub fn is_tab(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Tab,
            ..
        }
    )
}

/// Check if the key event is the Escape key.
pub fn is_escape(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Esc,
            ..
        }
    )
}

/// Check if the key event is the down navigation key (j or Down arrow).
pub fn is_down(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Down,
            ..
        }
    )
}

/// Check if the key event is the up navigation key (k or Up arrow).
pub fn is_up(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('k'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Up,
            ..
        }
    )
}

/// Check if the key event scrolls left (h or Left arrow).
pub fn is_left(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('h'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Left,
            ..
        }
    )
}

/// Check if the key event scrolls right (l or Right arrow).
pub fn is_right(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('l'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Right,
            ..
        }
    )
}

/// Check if the key event is Home (scroll to the axis start).
pub fn is_home(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Home,
            ..
        }
    )
}

/// Check if the key event is End (scroll to the axis end).
pub fn is_end(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::End,
            ..
        }
    )
}

/// Check if the key event is the v key (cycle timeline view).
pub fn is_cycle_view(key: &KeyEvent) -> bool {
    is_plain_char(key, 'v')
}

/// Check if the key event is the t key (scroll to today).
pub fn is_today(key: &KeyEvent) -> bool {
    is_plain_char(key, 't')
}

/// Check if the key event is the r key (reload the plan file).
pub fn is_reload(key: &KeyEvent) -> bool {
    is_plain_char(key, 'r')
}

fn is_plain_char(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers == KeyModifiers::NONE
}
