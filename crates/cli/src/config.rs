use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use objkv_core::store::local::LocalStore;
use objkv_core::{Backend, ObjectStoreBackend};

const CONFIG_FILE: &str = "objkv.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    #[serde(rename = "manta")]
    Manta {
        path: String,
        endpoint: Option<String>,
        user: Option<String>,
        keyid: Option<String>,
        keypath: Option<String>,
    },
    #[serde(rename = "local")]
    Local { root: String, path: String },
}

impl BackendConfig {
    /// Settings map in the shape the Manta backend factory expects.
    fn manta_settings(&self) -> HashMap<String, String> {
        let mut conf = HashMap::new();
        if let BackendConfig::Manta {
            path,
            endpoint,
            user,
            keyid,
            keypath,
        } = self
        {
            conf.insert("path".to_string(), path.clone());
            let optional = [
                ("endpoint", endpoint),
                ("user", user),
                ("keyid", keyid),
                ("keypath", keypath),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    conf.insert(key.to_string(), value.clone());
                }
            }
        }
        conf
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("objkv")
            .join(CONFIG_FILE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config not found at {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config")
    }

    pub fn open_backend(&self) -> Result<Arc<dyn Backend>> {
        match &self.backend {
            BackendConfig::Manta { .. } => {
                let backend = objkv_manta::new_backend(&self.backend.manta_settings())
                    .context("failed to configure Manta backend")?;
                Ok(Arc::new(backend))
            }
            BackendConfig::Local { root, path } => {
                let store = LocalStore::init(root)
                    .with_context(|| format!("failed to create directory: {root}"))?;
                Ok(Arc::new(ObjectStoreBackend::new(Arc::new(store), path)))
            }
        }
    }
}
