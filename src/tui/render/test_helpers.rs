use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use std::path::Path;

use crate::io::store::{FileStore, KeyValueStore, MemoryStore};
use crate::model::{Config, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 12;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen for `app`
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

fn numbered(tasks: &[(&str, bool)]) -> Vec<Task> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, (text, completed))| Task {
            id: i as u64 + 1,
            text: text.to_string(),
            completed: *completed,
        })
        .collect()
}

/// An app over an in-memory store holding `tasks`, with ids 1..=n.
pub fn app_with_tasks(tasks: &[(&str, bool)]) -> App {
    let config = Config::default();
    let store = MemoryStore::new().with_entry(
        &config.storage.key,
        &serde_json::to_string(&numbered(tasks)).unwrap(),
    );
    App::new(Box::new(store), &config).unwrap()
}

/// Like `app_with_tasks`, but backed by a store file in `dir` that other
/// handles can write to.
pub fn app_over_dir(dir: &Path, tasks: &[(&str, bool)]) -> App {
    let config = Config::default();
    let mut store = FileStore::open(dir, &config.storage.file);
    store
        .set(&config.storage.key, &serde_json::to_string(&numbered(tasks)).unwrap())
        .unwrap();
    App::new(Box::new(store), &config).unwrap()
}

/// Overwrite the stored list from outside the app, as another process would
pub fn write_behind_app(dir: &Path, tasks: &[Task]) {
    let config = Config::default();
    FileStore::open(dir, &config.storage.file)
        .set(&config.storage.key, &serde_json::to_string(tasks).unwrap())
        .unwrap();
}
