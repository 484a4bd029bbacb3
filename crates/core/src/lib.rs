pub mod adapter;
pub mod backend;
pub mod error;
pub mod path;
pub mod store;

pub use adapter::ObjectStoreBackend;
pub use backend::{Backend, Entry};
pub use error::BackendError;
pub use store::{DirEntry, EntryKind, ObjectStore, StoreError, StoreErrorKind};
