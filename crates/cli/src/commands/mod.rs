pub mod delete;
pub mod get;
pub mod list;
pub mod put;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Store a value under a key
    Put(put::PutArgs),
    /// Print the value stored under a key
    Get(get::GetArgs),
    /// Delete a key (or everything below it)
    Delete(delete::DeleteArgs),
    /// List the names directly below a prefix
    List(list::ListArgs),
}
