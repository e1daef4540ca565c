use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::tui::line_input::LineInput;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay: ? or Esc closes it, everything else is ignored
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,
        (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = app.surface.rows.len().saturating_sub(1);
        }

        // Operations
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) | (_, KeyCode::Enter) => toggle_selected(app),
        (_, KeyCode::Char('a')) | (_, KeyCode::Char('i')) => {
            app.input.clear();
            app.mode = Mode::Insert;
        }
        (_, KeyCode::Char('e')) => begin_edit(app),
        (_, KeyCode::Char('d')) | (_, KeyCode::Delete) => {
            if let Some(id) = app.selected_id() {
                app.mode = Mode::Confirm(id);
            }
        }
        (_, KeyCode::Char('r')) => app.reload(),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    app.cursor = app.cursor.saturating_add_signed(delta);
    app.clamp_cursor();
}

fn toggle_selected(app: &mut App) {
    let Some(id) = app.selected_id() else {
        return;
    };
    let result = app.store.toggle(id, &mut app.surface);
    app.report(result);
    app.select_id(id);
}

/// Open the edit prompt seeded with the selected task's text
fn begin_edit(app: &mut App) {
    let Some(task) = app.selected() else {
        return;
    };
    let (id, text) = (task.id, task.text.clone());
    app.input = LineInput::with_text(&text);
    app.mode = Mode::Edit(id);
}
