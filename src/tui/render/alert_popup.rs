use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect_fixed;
use crate::tui::app::App;
use crate::util::text::{display_width, truncate_to_width};

/// Blocking alert box; any key dismisses it
pub fn render_alert_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref message) = app.surface.alert else {
        return;
    };
    let bg = app.theme.background;
    let footer = "press any key";

    let inner_width = display_width(message).max(display_width(footer)) + 2;
    let popup = centered_rect_fixed(inner_width as u16 + 2, 5, area);
    frame.render_widget(Clear, popup);

    let room = popup.width.saturating_sub(4) as usize;
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(message, room)),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", footer),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn no_alert_draws_nothing() {
        let app = app_with_tasks(&[]);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_alert_popup(frame, &app, area)
        });
        assert_eq!(out, "");
    }

    #[test]
    fn alert_message_in_box() {
        let mut app = app_with_tasks(&[]);
        app.surface.alert = Some("Please write something first!".into());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_alert_popup(frame, &app, area)
        });
        assert!(out.contains("Please write something first!"));
        assert!(out.contains("press any key"));
        assert!(out.contains('\u{250C}'));
    }
}
