use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

/// Shared line-editing keys. Returns true if the key was consumed.
fn edit_line(app: &mut App, key: KeyEvent) -> bool {
    let input = &mut app.input;
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => input.delete_word_back(),
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => input.clear(),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => input.home(),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => input.end(),
        (_, KeyCode::Home) => input.home(),
        (_, KeyCode::End) => input.end(),
        (_, KeyCode::Backspace) => input.backspace(),
        (_, KeyCode::Delete) => input.delete(),
        (_, KeyCode::Left) => input.left(),
        (_, KeyCode::Right) => input.right(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        _ => return false,
    }
    true
}

/// Typing a new task. Enter submits and stays in insert mode for the next
/// one; Esc leaves.
pub(super) fn handle_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let raw = app.input.as_str().to_string();
            let result = app.store.create(&raw, &mut app.surface);
            if let Some(task) = app.report(result) {
                app.input.clear();
                app.select_id(task.id);
            }
        }
        _ => {
            edit_line(app, key);
        }
    }
}

/// Editing an existing task. The typed text is handed to the store as the
/// prompt reply; Esc hands it a cancellation.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent, id: u64) {
    let reply = match key.code {
        KeyCode::Esc => None,
        KeyCode::Enter => Some(app.input.as_str().to_string()),
        _ => {
            edit_line(app, key);
            return;
        }
    };
    app.surface.answer_prompt(reply);
    let result = app.store.edit(id, &mut app.surface);
    app.report(result);
    app.input.clear();
    app.mode = Mode::Navigate;
    app.select_id(id);
}
