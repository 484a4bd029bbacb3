use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use objkv_core::{Backend, Entry};

#[derive(Args)]
pub struct PutArgs {
    /// Key to write, e.g. secret/foo
    key: String,

    /// Value as text
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    value: Option<String>,

    /// Read the value from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

pub async fn run(backend: &dyn Backend, args: PutArgs) -> Result<()> {
    let value = match (args.value, args.file) {
        (Some(text), _) => text.into_bytes(),
        (None, Some(path)) => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --value or --file is required"),
    };

    let entry = Entry::new(args.key, value);
    backend.put(&entry).await?;
    info!(key = %entry.key, size = entry.value.len(), "Stored");
    Ok(())
}
