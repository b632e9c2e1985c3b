//! Inferview CLI - upload CSV files for type inference and view the results.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::client_config(cli.api_url.as_deref(), cli.timeout);

    let result = match cli.command {
        Commands::Upload {
            file,
            show,
            display,
        } => commands::upload::run(file, show, &display, config),

        Commands::Show { id, display } => commands::show::run(id, &display, config),

        Commands::Render { file, display } => commands::render::run(file, &display),

        Commands::Classify { tags } => commands::classify::run(&tags),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var("RUST_LOG").is_err() {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        builder.filter_level(level);
    }
    let _ = builder.format_timestamp_millis().try_init();
}
