use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::app::{App, Commands};

mod cli;

fn main() {
    let app = App::parse();

    let log_level = match app.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!(?app, "parsed arguments");

    let result = match app.cmd {
        Commands::Create(arg) => arg.run(),
        Commands::Read(arg) => arg.run(),
        Commands::List(arg) => arg.run(),
        Commands::Extract(arg) => arg.run(),
    };

    if let Err(e) = result {
        tracing::debug!("command failed: {e:?}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
