pub mod auth;
pub mod client;
pub mod config;
pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use objkv_core::ObjectStoreBackend;
use tracing::info;

pub use client::MantaClient;
pub use config::{ConfigError, MantaConfig};

/// Creates a backend from a construction-time settings map.
///
/// Recognised keys are `endpoint`, `user`, `keyid`, `path` and `keypath`;
/// the first three can be overridden by `MANTA_URL`, `MANTA_USER` and
/// `MANTA_KEY_ID`.
pub fn new_backend(conf: &HashMap<String, String>) -> Result<ObjectStoreBackend, ConfigError> {
    let config = MantaConfig::from_env(conf)?;
    let client = MantaClient::new(&config).inspect_err(|err| tracing::error!("{err}"))?;

    info!(
        endpoint = %config.endpoint,
        user = %config.user,
        path = %config.base_directory,
        "Manta backend configured"
    );
    Ok(ObjectStoreBackend::new(
        Arc::new(client),
        &config.base_directory,
    ))
}
