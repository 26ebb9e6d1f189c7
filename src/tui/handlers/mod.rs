//! Event handlers for the TUI: keyboard, paste, and conversion results.

mod actions;
mod convert_spawn;
mod edit;

use std::sync::Arc;
use std::sync::mpsc;

use crossterm::event::KeyEvent;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::convert::{Conversion, ConvertOptions, Engine};

use super::app::{App, Focus, StatusKind};
use super::shortcuts::Shortcut;

/// Holds receivers for a conversion in progress.
pub struct PendingConversion {
    pub progress_rx: mpsc::Receiver<String>,
    pub result_rx: mpsc::Receiver<Conversion>,
    /// Token to cancel the remaining chunks.
    pub cancel_token: CancellationToken,
}

/// Result of handling an event: continue the loop or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Break,
}

pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub engine: &'a Arc<Engine>,
    pub options: &'a ConvertOptions,
    pub pending: &'a mut Option<PendingConversion>,
    pub rt: &'a Arc<Runtime>,
}

/// Handle a key event.
pub fn handle_key(key: KeyEvent, ctx: HandleKeyContext) -> HandleResult {
    let HandleKeyContext {
        app,
        engine,
        options,
        pending,
        rt,
    } = ctx;

    let Some(shortcut) = Shortcut::match_key(&key) else {
        edit::handle_edit_key(key, app);
        return HandleResult::Continue;
    };

    match shortcut {
        Shortcut::Quit => {
            if let Some(p) = pending.as_ref() {
                p.cancel_token.cancel();
            }
            return HandleResult::Break;
        }
        Shortcut::Convert => actions::start_conversion(app, engine, options, pending, rt),
        Shortcut::Save => actions::save_output(app),
        Shortcut::Copy => actions::copy_output(app),
        Shortcut::Paste => actions::paste_clipboard(app),
        Shortcut::Open => actions::open_saved(app),
        Shortcut::Clear => {
            app.clear_input();
            app.set_status(StatusKind::Info, "Input cleared");
        }
        Shortcut::SwitchPane => {
            app.focus = match app.focus {
                Focus::Input => Focus::Output,
                Focus::Output => Focus::Input,
            };
        }
        Shortcut::Cancel => {
            if let Some(p) = pending.as_ref() {
                p.cancel_token.cancel();
                app.set_status(StatusKind::Warning, "Cancelling...");
            } else if app.focus == Focus::Output {
                app.focus = Focus::Input;
            }
        }
    }
    HandleResult::Continue
}

/// Bracketed paste from the terminal goes into the input pane.
pub fn handle_paste(text: &str, app: &mut App) {
    app.focus = Focus::Input;
    app.insert_str(text);
}

/// Drain progress messages and take the result once the worker is done.
pub fn poll_pending(app: &mut App, pending: &mut Option<PendingConversion>) {
    let Some(p) = pending.as_ref() else {
        return;
    };
    while let Ok(msg) = p.progress_rx.try_recv() {
        app.progress = Some(msg);
    }
    match p.result_rx.try_recv() {
        Ok(conversion) => {
            app.finish_conversion(conversion);
            *pending = None;
        }
        Err(mpsc::TryRecvError::Empty) => {}
        Err(mpsc::TryRecvError::Disconnected) => {
            app.converting = false;
            app.progress = None;
            app.set_status(StatusKind::Error, "Conversion worker stopped unexpectedly");
            *pending = None;
        }
    }
}

#[cfg(test)]
mod tests;
