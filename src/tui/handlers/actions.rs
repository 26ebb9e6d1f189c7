//! Shortcut actions: convert, save, clipboard, open.

use std::sync::Arc;

use log::warn;
use tokio::runtime::Runtime;

use crate::core::convert::{ConvertOptions, Engine};
use crate::core::document::{self, MIME_TYPE};

use super::super::app::{App, Focus, StatusKind};
use super::PendingConversion;
use super::convert_spawn;

pub(super) fn start_conversion(
    app: &mut App,
    engine: &Arc<Engine>,
    options: &ConvertOptions,
    pending: &mut Option<PendingConversion>,
    rt: &Arc<Runtime>,
) {
    if pending.is_some() {
        app.set_status(StatusKind::Info, "A conversion is already running");
        return;
    }
    let text = match document::validate_input(&app.input) {
        Ok(text) => text.to_string(),
        Err(e) => {
            app.set_status(StatusKind::Warning, format!("⚠ {}", e));
            return;
        }
    };
    app.converting = true;
    app.progress = None;
    app.set_status(StatusKind::Info, "Processing equations...");
    *pending = Some(convert_spawn::spawn_conversion(
        rt,
        Arc::clone(engine),
        text,
        *options,
    ));
}

pub(super) fn save_output(app: &mut App) {
    if app.output.is_empty() {
        app.set_status(
            StatusKind::Warning,
            "Nothing to save yet: convert first (Ctrl+R)",
        );
        return;
    }
    match document::save(&app.save_path, &app.output) {
        Ok(path) => {
            app.set_status(
                StatusKind::Success,
                format!("✓ Saved to {} ({})", path.display(), MIME_TYPE),
            );
            app.last_saved = Some(path);
        }
        Err(e) => {
            warn!("Saving {} failed: {}", app.save_path.display(), e);
            app.set_status(
                StatusKind::Error,
                format!("Could not save {}: {}", app.save_path.display(), e),
            );
        }
    }
}

pub(super) fn copy_output(app: &mut App) {
    if app.output.is_empty() {
        app.set_status(StatusKind::Warning, "Nothing to copy yet");
        return;
    }
    let content = app.output.clone();
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(content)) {
        Ok(()) => app.set_status(StatusKind::Success, "✓ Output copied to clipboard"),
        Err(e) => app.set_status(StatusKind::Error, format!("Clipboard unavailable: {}", e)),
    }
}

pub(super) fn paste_clipboard(app: &mut App) {
    match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
        Ok(text) => {
            app.focus = Focus::Input;
            app.insert_str(&text);
        }
        Err(e) => app.set_status(StatusKind::Warning, format!("Nothing to paste: {}", e)),
    }
}

pub(super) fn open_saved(app: &mut App) {
    let Some(path) = app.last_saved.clone() else {
        app.set_status(StatusKind::Warning, "Save first with Ctrl+S");
        return;
    };
    if let Err(e) = opener::open(&path) {
        warn!("Could not open {}: {}", path.display(), e);
        app.set_status(
            StatusKind::Error,
            format!("Could not open {}: {}", path.display(), e),
        );
    }
}
