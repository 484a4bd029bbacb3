use anyhow::Result;
use clap::Args;
use tracing::info;

use objkv_core::Backend;

#[derive(Args)]
pub struct DeleteArgs {
    /// Key to delete
    key: String,
}

pub async fn run(backend: &dyn Backend, args: DeleteArgs) -> Result<()> {
    backend.delete(&args.key).await?;
    info!(key = %args.key, "Deleted");
    Ok(())
}
