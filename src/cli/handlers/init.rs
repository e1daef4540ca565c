use std::fs;
use std::path::Path;

use tracing::info;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, DATA_DIR_NAME};

const CONFIG_TOML_TEMPLATE: &str = r##"# tick configuration. Every setting is optional.

[storage]
# key holding the task list inside the store file
key = "todos"
file = "store.json"

[notice]
# how long confirmation notices stay on screen
duration_secs = 3

[ui]
show_key_hints = true

# --- Colors ---
# Uncomment and edit to override defaults.
#
# [ui.colors]
# background = "#0C001B"
# text = "#A09BFE"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#5A5580"
# red = "#FF4444"
# green = "#44FF88"
# selection_bg = "#1E1040"
"##;

/// Create `.tick/` with a commented config in `dir`
pub fn init_dir(dir: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = dir.join(DATA_DIR_NAME);
    let config_path = data_dir.join("config.toml");

    if config_path.exists() && !force {
        return Err(format!(
            "tick list already exists in ./{}/ (use --force to rewrite config.toml)",
            DATA_DIR_NAME
        )
        .into());
    }

    // Note a list further up that this one will shadow
    if let Some(parent) = dir.parent()
        && let Ok(outer) = config_io::discover_data_dir(parent)
    {
        eprintln!("Note: parent list found at {}/", outer.display());
    }

    fs::create_dir_all(&data_dir)?;
    fs::write(&config_path, CONFIG_TOML_TEMPLATE)?;
    info!(path = %config_path.display(), "initialized");
    Ok(())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    init_dir(&cwd, args.force)?;
    println!("Initialized tick list in ./{}/", DATA_DIR_NAME);
    Ok(())
}
