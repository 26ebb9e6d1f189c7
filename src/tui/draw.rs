//! TUI rendering: header, input and output panes, status line, key hints.

use std::sync::OnceLock;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::app as app_info;

use super::app::{App, Focus, StatusKind};
use super::constants::{ACCENT, ACCENT_SECONDARY, HELP_TEXT, SPINNER};

/// Start time for the spinner animation phase.
static SPINNER_START: OnceLock<Instant> = OnceLock::new();

pub(super) fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    draw_header(f, app, rows[0]);
    draw_input(f, app, panes[0]);
    draw_output(f, app, panes[1]);
    draw_status(f, app, rows[2]);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            HELP_TEXT,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[3],
    );
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { ACCENT } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color)))
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", app_info::NAME),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{}", app_info::VERSION),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(app.engine_label.as_str(), Style::default().fg(ACCENT_SECONDARY)),
        Span::styled(
            format!("  → {}", app.save_path.display()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_input(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let block = pane_block(" Input Markdown ", focused);
    let inner = block.inner(area);
    app.adjust_input_view(inner.height, inner.width);
    let (top, left) = app.input_view;

    let paragraph = Paragraph::new(app.input.as_str())
        .block(block)
        .scroll((top, left));
    f.render_widget(paragraph, area);

    if focused {
        let (line, col) = app.cursor_line_col();
        let y = inner.y + (line as u16).saturating_sub(top);
        let x = inner.x + (col as u16).saturating_sub(left);
        f.set_cursor_position(Position::new(x, y));
    }
}

fn draw_output(f: &mut Frame, app: &mut App, area: Rect) {
    let block = pane_block(" Converted Output ", app.focus == Focus::Output);
    let inner = block.inner(area);
    app.output_size = (inner.width, inner.height);
    // Re-clamp after a resize
    app.scroll_output(0);
    let paragraph = if app.output.is_empty() {
        Paragraph::new(Span::styled(
            "Converted Markdown appears here",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.output.as_str())
    };
    f.render_widget(
        paragraph
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.output_scroll, 0)),
        area,
    );
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.converting {
        let start = SPINNER_START.get_or_init(Instant::now);
        let frame = (start.elapsed().as_millis() / 120) as usize % SPINNER.len();
        let text = app.progress.as_deref().unwrap_or(app.status.text.as_str());
        Line::from(vec![
            Span::styled(format!("{} ", SPINNER[frame]), Style::default().fg(ACCENT)),
            Span::raw(text),
        ])
    } else {
        let color = match app.status.kind {
            StatusKind::Info => Color::Gray,
            StatusKind::Success => ACCENT,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        Line::from(Span::styled(
            app.status.text.as_str(),
            Style::default().fg(color),
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}
