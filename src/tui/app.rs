use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info, warn};

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{FileStore, KeyValueStore};
use crate::io::watcher::StoreWatcher;
use crate::model::{Config, Summary, Task};
use crate::ops::frontend::{Confirmation, Notifier, Prompter, RenderSurface};
use crate::ops::notice::NoticeBoard;
use crate::ops::task_ops::TaskError;
use crate::ops::task_store::TaskStore;

use super::input;
use super::line_input::LineInput;
use super::render;
use super::theme::Theme;

pub type DynStore = Box<dyn KeyValueStore>;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input line
    Insert,
    /// Editing the text of the task with this id
    Edit(u64),
    /// Waiting for y/n before deleting the task with this id
    Confirm(u64),
}

/// What the store renders into.
///
/// Modal answers are collected by the key handlers first and then replayed
/// to the store through the `Prompter` impl, so store operations stay
/// synchronous.
#[derive(Debug, Default)]
pub struct TuiSurface {
    pub rows: Vec<Task>,
    pub summary: Summary,
    pub notices: NoticeBoard,
    /// Blocking alert; intercepts all input until dismissed
    pub alert: Option<String>,
    pending_confirm: Option<Confirmation>,
    pending_reply: Option<String>,
}

impl TuiSurface {
    pub fn new(notice_duration: Duration) -> Self {
        TuiSurface {
            notices: NoticeBoard::new(notice_duration),
            ..Default::default()
        }
    }

    /// Stage the answer the next `confirm` call returns
    pub fn answer_confirm(&mut self, answer: Confirmation) {
        self.pending_confirm = Some(answer);
    }

    /// Stage the reply the next `prompt` call returns (`None` = cancelled)
    pub fn answer_prompt(&mut self, reply: Option<String>) {
        self.pending_reply = reply;
    }
}

impl RenderSurface for TuiSurface {
    fn render_tasks(&mut self, tasks: &[Task]) {
        self.rows = tasks.to_vec();
    }

    fn render_summary(&mut self, summary: &Summary) {
        self.summary = *summary;
    }
}

impl Prompter for TuiSurface {
    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn confirm(&mut self, _message: &str) -> Confirmation {
        self.pending_confirm
            .take()
            .unwrap_or(Confirmation::Declined)
    }

    fn prompt(&mut self, _message: &str, _initial: &str) -> Option<String> {
        self.pending_reply.take()
    }
}

impl Notifier for TuiSurface {
    fn notify(&mut self, message: &str) {
        self.notices.post(message, Instant::now());
    }
}

/// Main application state
pub struct App {
    pub store: TaskStore<DynStore>,
    pub surface: TuiSurface,
    pub mode: Mode,
    /// Row index into `surface.rows`
    pub cursor: usize,
    /// First visible row
    pub scroll: usize,
    pub input: LineInput,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub show_help: bool,
    /// Last store failure, shown until the next key press
    pub error: Option<String>,
    /// Store changed on disk while a modal was open
    pub pending_reload: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: DynStore, config: &Config) -> Result<Self, TaskError> {
        let mut surface = TuiSurface::new(Duration::from_secs(config.notice.duration_secs));
        let store = TaskStore::open(store, config.storage.key.clone(), &mut surface)?;
        Ok(App {
            store,
            surface,
            mode: Mode::Navigate,
            cursor: 0,
            scroll: 0,
            input: LineInput::default(),
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            show_help: false,
            error: None,
            pending_reload: false,
            should_quit: false,
        })
    }

    pub fn selected(&self) -> Option<&Task> {
        self.surface.rows.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected().map(|t| t.id)
    }

    /// Keep the cursor on an existing row
    pub fn clamp_cursor(&mut self) {
        let len = self.surface.rows.len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    /// Move the cursor to the row showing `id`, if present
    pub fn select_id(&mut self, id: u64) -> bool {
        match self.surface.rows.iter().position(|t| t.id == id) {
            Some(i) => {
                self.cursor = i;
                true
            }
            None => false,
        }
    }

    /// Re-read the store after an external write, keeping the selection
    pub fn reload(&mut self) {
        let selected = self.selected_id();
        let result = self.store.reload(&mut self.surface);
        self.report(result);
        if !selected.is_some_and(|id| self.select_id(id)) {
            self.clamp_cursor();
        }
        self.pending_reload = false;
    }

    /// Route an operation result: missing targets and empty input are
    /// silent (the alert, if any, was raised by the store), store failures
    /// land in the status row.
    pub fn report<T>(&mut self, result: Result<T, TaskError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(TaskError::NotFound(_)) | Err(TaskError::EmptyInput) => None,
            Err(e) => {
                error!(error = %e, "task operation failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

/// Restore cursor position from .state.json
pub fn restore_ui_state(app: &mut App, data_dir: &Path) {
    let Some(state) = read_ui_state(data_dir) else {
        return;
    };
    if !state.selected_id.is_some_and(|id| app.select_id(id)) {
        app.cursor = state.cursor;
        app.clamp_cursor();
    }
}

/// Save cursor position to .state.json
pub fn save_ui_state(app: &App, data_dir: &Path) {
    let state = UiState {
        selected_id: app.selected_id(),
        cursor: app.cursor,
    };
    if let Err(e) = write_ui_state(data_dir, &state) {
        warn!(error = %e, "could not save UI state");
    }
}

/// Run the TUI against the list in `data_dir`
pub fn run(data_dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let file_store = FileStore::open(data_dir, &config.storage.file);
    let store_path: PathBuf = file_store.path().to_path_buf();
    let mut app = App::new(Box::new(file_store), config)?;
    restore_ui_state(&mut app, data_dir);

    let watcher = match StoreWatcher::start(&store_path) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watching disabled");
            None
        }
    };
    info!(data_dir = %data_dir.display(), tasks = app.store.tasks().len(), "starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    save_ui_state(&app, data_dir);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let event = if event::poll(Duration::from_millis(250))? {
            Some(event::read()?)
        } else {
            None
        };

        // Catch up with external writes before acting on the key
        if watcher.is_some_and(|w| w.changed()) {
            app.pending_reload = true;
        }
        if app.pending_reload && app.mode == Mode::Navigate && app.surface.alert.is_none() {
            app.reload();
        }

        match event {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
            Some(Event::Paste(text)) => input::handle_paste(app, &text),
            _ => {}
        }

        app.surface.notices.expire(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
