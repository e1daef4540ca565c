use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tick", about = concat!("[x] tick v", env!("CARGO_PKG_VERSION"), " - a tiny task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this data directory instead of searching for .tick/
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create .tick/ in the current directory
    Init(InitArgs),
    /// List tasks
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Flip a task between pending and done
    Toggle(IdArg),
    /// Delete a task
    Delete(DeleteArgs),
    /// Change a task's text
    Edit(EditArgs),
    /// Show task counts
    Stats,
    /// Read or write a config value
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only pending tasks
    #[arg(long, conflicts_with = "done")]
    pub pending: bool,
    /// Only completed tasks
    #[arg(long)]
    pub done: bool,
    /// Only tasks whose text matches this regex (case-insensitive)
    #[arg(long)]
    pub grep: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: u64,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID
    pub id: u64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New text; prompts on stdin when omitted
    #[arg(num_args = 0.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. notice.duration_secs
    pub key: String,
    /// New value; prints the current value when omitted
    pub value: Option<String>,
}
