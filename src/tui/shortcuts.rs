//! Centralized keyboard shortcuts.
//!
//! | Action          | Keys              |
//! |-----------------|-------------------|
//! | Convert         | Ctrl+R, F5        |
//! | Save output     | Ctrl+S            |
//! | Copy output     | Ctrl+Y            |
//! | Paste           | Ctrl+V (or terminal paste) |
//! | Clear input     | Ctrl+L            |
//! | Open saved file | Ctrl+O            |
//! | Switch pane     | Tab               |
//! | Cancel          | Esc               |
//! | Quit            | Ctrl+Q, Ctrl+C    |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Convert,
    Save,
    Copy,
    Paste,
    Clear,
    Open,
    SwitchPane,
    Cancel,
    Quit,
}

impl Shortcut {
    /// Returns the shortcut if the key matches one. Plain editing keys return `None`.
    pub fn match_key(key: &KeyEvent) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'r' => Some(Shortcut::Convert),
                's' => Some(Shortcut::Save),
                'y' => Some(Shortcut::Copy),
                'v' => Some(Shortcut::Paste),
                'l' => Some(Shortcut::Clear),
                'o' => Some(Shortcut::Open),
                'q' | 'c' => Some(Shortcut::Quit),
                _ => None,
            },
            KeyCode::F(5) => Some(Shortcut::Convert),
            KeyCode::Tab | KeyCode::BackTab => Some(Shortcut::SwitchPane),
            KeyCode::Esc => Some(Shortcut::Cancel),
            _ => None,
        }
    }
}
