use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::text::{display_width, truncate_to_width};

const EMPTY_STATE: &str = "No tasks yet. Press a to add one.";

/// Adjust `scroll` so `cursor` is inside a window of `height` rows
pub(crate) fn scroll_to_cursor(scroll: usize, cursor: usize, height: usize, len: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let mut scroll = scroll.min(len.saturating_sub(height));
    if cursor < scroll {
        scroll = cursor;
    } else if cursor >= scroll + height {
        scroll = cursor + 1 - height;
    }
    scroll
}

/// The task rows, or the empty-state placeholder when there are none
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let height = area.height as usize;

    if app.surface.summary.is_empty() {
        let pad = width.saturating_sub(display_width(EMPTY_STATE)) / 2;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{}{}", " ".repeat(pad), EMPTY_STATE),
                Style::default().fg(app.theme.dim).bg(bg),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
        return;
    }

    app.scroll = scroll_to_cursor(app.scroll, app.cursor, height, app.surface.rows.len());
    // Cursor highlight is hidden while typing a new task
    let show_cursor = app.mode != Mode::Insert;

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (i, task) in app
        .surface
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(height)
    {
        let selected = show_cursor && i == app.cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let marker = if selected { "\u{258E}" } else { " " };

        let box_color = if task.completed {
            app.theme.green
        } else {
            app.theme.text
        };
        let mut text_style = Style::default()
            .fg(app.theme.task_color(task.completed))
            .bg(row_bg);
        if task.completed {
            text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
        }
        if selected {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }

        // marker + checkbox + space
        let prefix_width = 5;
        let text = truncate_to_width(&task.text, width.saturating_sub(prefix_width));
        let used = prefix_width + display_width(&text);

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
            Span::styled(task.checkbox(), Style::default().fg(box_color).bg(row_bg)),
            Span::styled(" ", Style::default().bg(row_bg)),
            Span::styled(text, text_style),
        ];
        if selected && used < width {
            spans.push(Span::styled(
                " ".repeat(width - used),
                Style::default().bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
