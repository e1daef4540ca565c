mod init;
pub use init::cmd_init;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::store::FileStore;
use crate::model::task::{Summary, Task};
use crate::ops::frontend::{Confirmation, Notifier, Prompter, RenderSurface};
use crate::ops::task_ops::{self, StatusFilter, TaskError};
use crate::ops::task_store::{Change, TaskStore};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Frontend
// ---------------------------------------------------------------------------

/// Line-oriented frontend: notices and alerts go to stderr so stdout only
/// carries command output.
pub struct CliSurface<R> {
    pub rows: Vec<Task>,
    pub summary: Summary,
    /// Last alert raised by the store, reported as the command's error
    pub alert: Option<String>,
    /// Answer every confirmation with yes (`--yes`)
    pub assume_yes: bool,
    /// Reply for the next prompt instead of reading `input`
    pub reply: Option<String>,
    /// Suppress notices (`--json`)
    pub quiet: bool,
    input: R,
}

impl<R: BufRead> CliSurface<R> {
    pub fn new(input: R) -> Self {
        CliSurface {
            rows: Vec::new(),
            summary: Summary::default(),
            alert: None,
            assume_yes: false,
            reply: None,
            quiet: false,
            input,
        }
    }

    /// One trimmed line from input; `None` at end of input
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

impl<R> RenderSurface for CliSurface<R> {
    fn render_tasks(&mut self, tasks: &[Task]) {
        self.rows = tasks.to_vec();
    }

    fn render_summary(&mut self, summary: &Summary) {
        self.summary = *summary;
    }
}

impl<R: BufRead> Prompter for CliSurface<R> {
    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> Confirmation {
        if self.assume_yes {
            return Confirmation::Confirmed;
        }
        if !ask(&mut io::stderr().lock(), &format!("{} [y/N]", message)) {
            return Confirmation::Declined;
        }
        match self.read_line() {
            Some(answer) if matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes") => {
                Confirmation::Confirmed
            }
            _ => Confirmation::Declined,
        }
    }

    /// A blank answer keeps the current text
    fn prompt(&mut self, message: &str, initial: &str) -> Option<String> {
        if let Some(reply) = self.reply.take() {
            return Some(reply);
        }
        if !ask(&mut io::stderr().lock(), &format!("{} [{}]", message, initial)) {
            return None;
        }
        self.read_line().filter(|line| !line.trim().is_empty())
    }
}

/// Show a question and flush it. An unseen question can't be answered, so
/// a failed write reads as declined.
fn ask(out: &mut impl Write, question: &str) -> bool {
    match write!(out, "{} ", question).and_then(|()| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "could not show prompt");
            false
        }
    }
}

impl<R> Notifier for CliSurface<R> {
    fn notify(&mut self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let flag = cli.data_dir.as_deref();
    let data_dir = || -> Result<PathBuf, Box<dyn std::error::Error>> {
        let dir = resolve_data_dir(flag)?;
        debug!(data_dir = %dir.display(), "resolved data directory");
        Ok(dir)
    };

    match cli.command {
        None => Ok(()),
        // Init runs before any .tick/ exists
        Some(Commands::Init(args)) => cmd_init(args),
        Some(Commands::List(args)) => cmd_list(&data_dir()?, args, json),
        Some(Commands::Add(args)) => cmd_add(&data_dir()?, args, json),
        Some(Commands::Toggle(args)) => cmd_toggle(&data_dir()?, args, json),
        Some(Commands::Delete(args)) => cmd_delete(&data_dir()?, args, json),
        Some(Commands::Edit(args)) => cmd_edit(&data_dir()?, args, json),
        Some(Commands::Stats) => cmd_stats(&data_dir()?, json),
        Some(Commands::Config(args)) => cmd_config(&data_dir()?, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The `.tick` directory: `-C` may name it directly or a directory inside
/// the list; otherwise search upward from the current directory.
pub fn resolve_data_dir(flag: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let start = match flag {
        Some(dir) => {
            let abs = std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
            if abs.join("config.toml").is_file() {
                return Ok(abs);
            }
            abs
        }
        None => std::env::current_dir()?,
    };
    Ok(config_io::discover_data_dir(&start)?)
}

fn open_store(data_dir: &Path) -> Result<TaskStore<FileStore>, Box<dyn std::error::Error>> {
    let config = config_io::load_config(data_dir)?;
    let mut store = TaskStore::new(
        FileStore::open(data_dir, &config.storage.file),
        config.storage.key.clone(),
    );
    store.load()?;
    Ok(store)
}

fn stdin_surface(json: bool) -> CliSurface<io::StdinLock<'static>> {
    let mut surface = CliSurface::new(io::stdin().lock());
    surface.quiet = json;
    surface
}

/// Turn a store-level failure into the message the user should see
fn explain(err: TaskError, surface: &mut CliSurface<impl BufRead>) -> Box<dyn std::error::Error> {
    match (err, surface.alert.take()) {
        (TaskError::EmptyInput, Some(alert)) => alert.into(),
        (err, _) => err.into(),
    }
}

fn print_task(task: &Task, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let store = open_store(data_dir)?;
    let status = if args.pending {
        StatusFilter::Pending
    } else if args.done {
        StatusFilter::Done
    } else {
        StatusFilter::All
    };
    let pattern = args.grep.as_deref().and_then(task_ops::compile_pattern);
    let tasks = task_ops::filter_tasks(store.tasks(), status, pattern.as_ref());

    if json {
        let out = TaskListJson {
            tasks,
            summary: store.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if store.tasks().is_empty() {
        println!("No tasks yet. Add one with `tick add <text>`.");
        return Ok(());
    }
    for line in format_task_list(&tasks) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_add(data_dir: &Path, args: AddArgs, json: bool) -> CmdResult {
    let mut store = open_store(data_dir)?;
    let mut surface = stdin_surface(json);
    let text = args.text.join(" ");
    let task = store
        .create(&text, &mut surface)
        .map_err(|e| explain(e, &mut surface))?;
    if json {
        print_task(&task, true)
    } else {
        println!("{}", task.id);
        Ok(())
    }
}

fn cmd_toggle(data_dir: &Path, args: IdArg, json: bool) -> CmdResult {
    let mut store = open_store(data_dir)?;
    let mut surface = stdin_surface(json);
    let task = store.toggle(args.id, &mut surface)?;
    print_task(&task, json)
}

fn cmd_delete(data_dir: &Path, args: DeleteArgs, json: bool) -> CmdResult {
    let mut store = open_store(data_dir)?;
    let mut surface = stdin_surface(json);
    surface.assume_yes = args.yes;
    match store.delete(args.id, &mut surface)? {
        Change::Applied(task) => {
            if json {
                print_task(&task, true)?;
            }
        }
        Change::Cancelled => eprintln!("Cancelled."),
    }
    Ok(())
}

fn cmd_edit(data_dir: &Path, args: EditArgs, json: bool) -> CmdResult {
    let mut store = open_store(data_dir)?;
    let mut surface = stdin_surface(json);
    if !args.text.is_empty() {
        surface.reply = Some(args.text.join(" "));
    }
    match store.edit(args.id, &mut surface)? {
        Change::Applied(task) => print_task(&task, json),
        Change::Cancelled => {
            eprintln!("Unchanged.");
            Ok(())
        }
    }
}

fn cmd_stats(data_dir: &Path, json: bool) -> CmdResult {
    let store = open_store(data_dir)?;
    let summary = store.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

fn cmd_config(data_dir: &Path, args: ConfigArgs, json: bool) -> CmdResult {
    let (_, mut doc) = config_io::read_config(data_dir)?;
    if let Some(ref raw) = args.value {
        config_io::set_value(&mut doc, &args.key, raw)?;
        config_io::write_config(data_dir, &doc)?;
    }
    let value = config_io::get_value(&doc, &args.key)?;
    if json {
        let out = ConfigValueJson {
            key: &args.key,
            value,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    match value {
        Some(v) => println!("{}", v),
        None if args.value.is_none() => {
            return Err(ConfigError::InvalidKey(format!("{} is not set", args.key)).into());
        }
        None => {}
    }
    Ok(())
}
