//! TUI application state: input buffer, output, focus, status line.
//!
//! The latest converted output lives here, not in the conversion pipeline.

use std::path::PathBuf;

use ratatui::widgets::{Paragraph, Wrap};

use crate::core::convert::Conversion;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

pub struct App {
    pub(super) input: String,
    /// Byte offset of the cursor in `input` (always on a char boundary).
    pub(super) cursor: usize,
    pub(super) output: String,
    pub(super) focus: Focus,
    /// Top line and left column of the input viewport.
    pub(super) input_view: (u16, u16),
    pub(super) output_scroll: u16,
    /// Inner width and height of the output pane at the last draw.
    pub(super) output_size: (u16, u16),
    pub(super) status: Status,
    pub(super) engine_label: String,
    pub(super) save_path: PathBuf,
    pub(super) last_saved: Option<PathBuf>,
    pub(super) converting: bool,
    pub(super) progress: Option<String>,
}

impl App {
    pub fn new(engine_label: String, save_path: PathBuf, input: String) -> Self {
        let cursor = input.len();
        Self {
            input,
            cursor,
            output: String::new(),
            focus: Focus::Input,
            input_view: (0, 0),
            output_scroll: 0,
            output_size: (0, 0),
            status: Status {
                kind: StatusKind::Info,
                text: "Paste Markdown with \\( ... \\) equations, then press Ctrl+R".to_string(),
            },
            engine_label,
            save_path,
            last_saved: None,
            converting: false,
            progress: None,
        }
    }

    pub(super) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Status {
            kind,
            text: text.into(),
        };
    }

    pub(super) fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text at the cursor. CRLF and lone CR become LF.
    pub(super) fn insert_str(&mut self, s: &str) {
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    pub(super) fn backspace(&mut self) {
        if let Some(c) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.input.remove(self.cursor);
        }
    }

    pub(super) fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    pub(super) fn move_left(&mut self) {
        if let Some(c) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub(super) fn move_right(&mut self) {
        if let Some(c) = self.input[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub(super) fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    pub(super) fn move_end(&mut self) {
        self.cursor = self.input[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.input.len());
    }

    /// Move the cursor one line up or down, keeping the column where possible.
    pub(super) fn move_vertical(&mut self, down: bool) {
        let (line, col) = self.cursor_line_col();
        let target = if down {
            line + 1
        } else if line == 0 {
            return;
        } else {
            line - 1
        };
        let mut offset = 0;
        for (i, text) in self.input.split('\n').enumerate() {
            if i == target {
                let byte_col = text
                    .char_indices()
                    .nth(col)
                    .map(|(b, _)| b)
                    .unwrap_or(text.len());
                self.cursor = offset + byte_col;
                return;
            }
            offset += text.len() + 1;
        }
    }

    pub(super) fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.input_view = (0, 0);
    }

    fn line_start(&self) -> usize {
        self.input[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Cursor line and column, both in characters from zero.
    pub(super) fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.input[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.line_start()..].chars().count();
        (line, col)
    }

    /// Scroll the input viewport just enough to keep the cursor visible.
    pub(super) fn adjust_input_view(&mut self, height: u16, width: u16) {
        let (line, col) = self.cursor_line_col();
        let line = u16::try_from(line).unwrap_or(u16::MAX);
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        let (mut top, mut left) = self.input_view;
        if height > 0 {
            if line < top {
                top = line;
            } else if line >= top.saturating_add(height) {
                top = line - height + 1;
            }
        }
        if width > 0 {
            if col < left {
                left = col;
            } else if col >= left.saturating_add(width) {
                left = col - width + 1;
            }
        }
        self.input_view = (top, left);
    }

    /// Rows the output takes once wrapped to the pane width. Logical lines
    /// before the first draw.
    fn output_rows(&self) -> usize {
        match self.output_size {
            (0, _) => self.output.lines().count(),
            (width, _) => Paragraph::new(self.output.as_str())
                .wrap(Wrap { trim: false })
                .line_count(width),
        }
    }

    /// Scroll by wrapped rows. The last position shows the final page in full.
    pub(super) fn scroll_output(&mut self, delta: i32) {
        let (_, height) = self.output_size;
        let max = self
            .output_rows()
            .saturating_sub(usize::from(height.max(1)));
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        let next = i32::from(self.output_scroll) + delta;
        self.output_scroll = next.clamp(0, i32::from(max)) as u16;
    }

    /// Take a finished conversion as the current output.
    pub(super) fn finish_conversion(&mut self, conversion: Conversion) {
        self.converting = false;
        self.progress = None;
        self.output_scroll = 0;
        let summary = conversion.summary();
        let (kind, text) = if conversion.skipped_count() > 0 {
            (
                StatusKind::Warning,
                format!("Cancelled: remaining chunks got the regex pass only ({})", summary),
            )
        } else if conversion.fallback_count() > 0 {
            (
                StatusKind::Warning,
                format!("Converted with regex fallback for some chunks ({})", summary),
            )
        } else {
            (StatusKind::Success, format!("✓ Conversion completed ({})", summary))
        };
        self.output = conversion.text;
        self.set_status(kind, text);
    }
}
