mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "objkv",
    version,
    about = "Key/value storage over a directory-based object store"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)?;
    let backend = config.open_backend()?;

    match cli.command {
        commands::Command::Put(args) => commands::put::run(backend.as_ref(), args).await,
        commands::Command::Get(args) => commands::get::run(backend.as_ref(), args).await,
        commands::Command::Delete(args) => commands::delete::run(backend.as_ref(), args).await,
        commands::Command::List(args) => commands::list::run(backend.as_ref(), args).await,
    }
}
