use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use common::{
    storage::db::SurrealDbClient,
    utils::config::{get_config, AppConfig},
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod commands;
mod datasets;
mod export;
mod menu;

use args::{Cli, Command};
use commands::{print_stats, print_summary, print_versions, App, ProcessOptions};
use menu::Menu;

fn main() -> Result<()> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    let cli = Cli::parse();

    let mut config = get_config().context("loading configuration")?;
    cli.apply_overrides(&mut config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let db = SurrealDbClient::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.surrealdb_address))?;
    info!(address = %config.surrealdb_address, "Connected to SurrealDB");

    let app = App::new(config, db);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Process(process) => {
            let options = ProcessOptions::from(&process);
            let summary = app.process_dataset(process.dataset, &options).await?;
            print_summary(&summary);
        }
        Command::List => {
            let versions = app.list_versions().await?;
            if versions.is_empty() {
                println!("No stored versions found.");
            } else {
                print_versions(&versions);
            }
        }
        Command::Show { version, limit } => {
            let limit = limit.unwrap_or(app.config().sample_limit);
            let stats = app.show_version(&version, limit).await?;
            print_stats(&stats);
        }
        Command::Delete { version } => {
            println!("{}", app.delete_version(&version).await?);
        }
        Command::DeleteAll { yes } => {
            if yes || confirm("Are you sure you want to delete ALL versions? (yes/no): ")? {
                let count = app.delete_all_versions().await?;
                println!("Deleted {count} versions.");
            } else {
                println!("Deletion cancelled.");
            }
        }
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(&app, stdin.lock()).run().await?;
        }
    }

    Ok(())
}

fn confirm(message: &str) -> Result<bool> {
    print!("{message}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
