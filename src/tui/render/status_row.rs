use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::task_store::{MSG_CONFIRM_DELETE, MSG_EDIT_PROMPT};
use crate::tui::app::{App, Mode};
use crate::util::text::{display_width, truncate_to_width};

const NAVIGATE_HINTS: &str = "a add  space toggle  e edit  d delete  ? help  q quit";

/// Append `hint` right-aligned if it fits after `spans`
fn push_hint<'a>(spans: &mut Vec<Span<'a>>, hint: &'a str, width: usize, style: Style, bg: Style) {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if used + hint_width < width {
        spans.push(Span::styled(" ".repeat(width - used - hint_width), bg));
        spans.push(Span::styled(hint, style));
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let bg_style = Style::default().bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = if let Some(ref err) = app.error {
        Line::from(Span::styled(
            truncate_to_width(&format!(" error: {}", err), width),
            Style::default().fg(app.theme.red).bg(bg),
        ))
    } else {
        match app.mode {
            Mode::Insert | Mode::Edit(_) => {
                let (label, hint) = if app.mode == Mode::Insert {
                    (" New task: ".to_string(), "Enter add  Esc done")
                } else {
                    (format!(" {} ", MSG_EDIT_PROMPT), "Enter save  Esc cancel")
                };
                let label_width = display_width(&label);
                let room = width.saturating_sub(label_width + 1);
                let (shown, cursor_col) = app.input.window(room);
                let mut spans = vec![
                    Span::styled(label, Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(shown, Style::default().fg(app.theme.text_bright).bg(bg)),
                ];
                push_hint(&mut spans, hint, width.saturating_sub(1), dim, bg_style);

                let col = (label_width + cursor_col).min(width.saturating_sub(1));
                frame.set_cursor_position(Position::new(area.x + col as u16, area.y));
                Line::from(spans)
            }
            Mode::Confirm(_) => {
                let mut spans = vec![Span::styled(
                    format!(" {} ", MSG_CONFIRM_DELETE),
                    Style::default().fg(app.theme.red).bg(bg),
                )];
                spans.push(Span::styled(
                    "(y/n)",
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ));
                Line::from(spans)
            }
            Mode::Navigate => {
                let mut spans = Vec::new();
                if let Some(notice) = app.surface.notices.visible(Instant::now()) {
                    spans.push(Span::styled(
                        format!(" {}", notice),
                        Style::default().fg(app.theme.green).bg(bg),
                    ));
                }
                if app.show_key_hints {
                    push_hint(&mut spans, NAVIGATE_HINTS, width, dim, bg_style);
                }
                Line::from(spans)
            }
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}
