use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use objkv_core::Backend;

#[derive(Args)]
pub struct GetArgs {
    /// Key to read
    key: String,

    /// Write the value to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub async fn run(backend: &dyn Backend, args: GetArgs) -> Result<()> {
    let entry = backend
        .get(&args.key)
        .await?
        .ok_or_else(|| anyhow::anyhow!("key not found: {}", args.key))?;

    match args.output {
        Some(path) => std::fs::write(&path, &entry.value)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&entry.value)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
