use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use axum::extract::FromRef;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod controllers;
mod db;
mod error;
mod html;
mod id;
mod models;
mod policy;
mod types;

use config::Config;
use db::Database;
pub(crate) use error::{ApiError, ApiResult};

/// A paste service where every paste burns out.
#[derive(Parser)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Delete every paste that is already past its expiry.
    PurgeExpired,
}

#[derive(Clone, FromRef)]
pub struct App {
    pub config: Config,
    pub database: Database,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config: Config =
        toml::from_str(&fs::read_to_string(&cli.config).context("failed to read config")?)
            .context("failed to deserialize config")?;

    let mut database = Database::connect(&config.database.url).await?;
    database.migrate().await.context("failed to run migration")?;

    let app = App { config, database };

    match cli.command {
        Command::Serve => commands::serve::run(app).await,
        Command::PurgeExpired => commands::purge_expired::run(app).await,
    }
}
