mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use tally::config::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for human and JSON output.
    // Negative stock warnings show by default; RUST_LOG=debug traces every mutation.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let settings = Settings::from_env();

    match cli.command {
        Command::Analyze { text, min_count } => {
            commands::cmd_analyze(text.as_deref(), min_count, &settings, cli.json)
        }
        Command::Inventory {
            stock,
            changes,
            low_stock,
        } => commands::cmd_inventory(&stock, &changes, low_stock, &settings, cli.json),
        Command::Sales { sales, threshold } => {
            commands::cmd_sales(&sales, threshold, &settings, cli.json)
        }
        Command::Tasks {
            tasks,
            add,
            remove,
            set,
        } => commands::cmd_tasks(&tasks, &add, &remove, &set, cli.json),
        Command::Auth {
            users,
            checks,
            algorithm,
        } => commands::cmd_auth(
            &users,
            &checks,
            algorithm.map(Into::into),
            &settings,
            cli.json,
        ),
        Command::Demo => commands::cmd_demo(&settings, cli.json),
    }
}
