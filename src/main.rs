use clap::Parser;
use tick::cli::commands::Cli;
use tick::cli::{handlers, logging};
use tick::io::config_io;

fn run_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = handlers::resolve_data_dir(cli.data_dir.as_deref())?;
    logging::init_file(&data_dir, cli.verbose)?;
    let config = config_io::load_config(&data_dir)?;
    tick::tui::run(&data_dir, &config)
}

fn main() {
    let cli = Cli::parse();

    let result = if cli.command.is_none() {
        // No subcommand → launch TUI
        run_tui(&cli)
    } else {
        logging::init_stderr(cli.verbose).and_then(|()| handlers::dispatch(cli))
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
