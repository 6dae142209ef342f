use clap::Parser;
use tasknest::cli::commands::Cli;
use tasknest::cli::handlers;
use tasknest::io::config_io::resolve_data_dir;
use tasknest::logging::init_logging;

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let _log_guard = init_logging(&data_dir);
    tracing::info!(dir = %data_dir.display(), "starting");

    match cli.command {
        // No subcommand → launch TUI
        None => tasknest::tui::run(&data_dir),
        Some(command) => handlers::dispatch(command, cli.json, &data_dir),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
