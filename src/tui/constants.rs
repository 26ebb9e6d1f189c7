//! TUI constants: colors, timing, scroll steps.

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Secondary accent, soft cyan (#7EC8E3).
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// Event poll timeout in milliseconds (main loop).
pub(super) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Scroll amount for arrow keys in the output pane.
pub(super) const SCROLL_LINES_SMALL: i32 = 1;

/// Scroll amount for PageUp/PageDown.
pub(super) const SCROLL_LINES_PAGE: i32 = 10;

/// Spinner frames while a conversion runs (braille pattern, 4 frames).
pub(super) const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸"];

/// Key hints in the bottom bar.
pub(super) const HELP_TEXT: &str = "Ctrl+R convert · Ctrl+S save · Ctrl+Y copy · Ctrl+V paste · Ctrl+L clear · Ctrl+O open · Tab switch pane · Esc cancel · Ctrl+Q quit";
