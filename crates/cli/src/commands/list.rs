use anyhow::Result;
use clap::Args;

use objkv_core::Backend;

#[derive(Args)]
pub struct ListArgs {
    /// Prefix to list (defaults to the base directory)
    #[arg(default_value = "")]
    prefix: String,
}

pub async fn run(backend: &dyn Backend, args: ListArgs) -> Result<()> {
    let names = backend.list(&args.prefix).await?;
    for name in &names {
        println!("{name}");
    }
    Ok(())
}
