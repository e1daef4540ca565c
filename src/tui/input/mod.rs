mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::{dismiss_alert, handle_confirm};
use edit::{handle_edit, handle_insert};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.error = None;

    // Alerts intercept all input
    if app.surface.alert.is_some() {
        dismiss_alert(app);
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Insert => handle_insert(app, key),
        Mode::Edit(id) => handle_edit(app, key, id),
        Mode::Confirm(id) => handle_confirm(app, key, id),
    }
}

/// Bracketed paste: only lands in the input line
pub fn handle_paste(app: &mut App, text: &str) {
    if matches!(app.mode, Mode::Insert | Mode::Edit(_)) && app.surface.alert.is_none() {
        app.input.insert_str(text);
    }
}

/// Shift+letter arrives as lowercase with SHIFT on some terminals
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}
