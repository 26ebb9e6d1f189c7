//! Plain editing and scrolling keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::super::app::{App, Focus};
use super::super::constants::{SCROLL_LINES_PAGE, SCROLL_LINES_SMALL};

pub(super) fn handle_edit_key(key: KeyEvent, app: &mut App) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    match key.code {
        KeyCode::PageUp => return app.scroll_output(-SCROLL_LINES_PAGE),
        KeyCode::PageDown => return app.scroll_output(SCROLL_LINES_PAGE),
        _ => {}
    }

    if app.focus == Focus::Output {
        match key.code {
            KeyCode::Up => app.scroll_output(-SCROLL_LINES_SMALL),
            KeyCode::Down => app.scroll_output(SCROLL_LINES_SMALL),
            KeyCode::Home => app.output_scroll = 0,
            KeyCode::End => app.scroll_output(i32::from(u16::MAX)),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.insert_char(c)
        }
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Up => app.move_vertical(false),
        KeyCode::Down => app.move_vertical(true),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        _ => {}
    }
}
