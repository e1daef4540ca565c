use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::frontend::Confirmation;
use crate::tui::app::{App, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent, id: u64) {
    let answer = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Confirmed,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Confirmation::Declined,
        _ => return,
    };
    app.mode = Mode::Navigate;
    app.surface.answer_confirm(answer);
    let result = app.store.delete(id, &mut app.surface);
    app.report(result);
    app.clamp_cursor();
}

pub(super) fn dismiss_alert(app: &mut App) {
    app.surface.alert = None;
}
