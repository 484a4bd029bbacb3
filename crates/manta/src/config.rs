use std::collections::HashMap;
use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

pub const ENV_URL: &str = "MANTA_URL";
pub const ENV_USER: &str = "MANTA_USER";
pub const ENV_KEY_ID: &str = "MANTA_KEY_ID";

const DEFAULT_KEY_FILE: &str = ".ssh/id_rsa";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{0}' must be set")]
    Missing(&'static str),

    #[error("invalid endpoint {endpoint:?}: {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("failed to read private key {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported private key in {}: {reason}", path.display())]
    KeyFormat { path: PathBuf, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Settings for one Manta-backed store, fixed once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MantaConfig {
    pub endpoint: Url,
    pub user: String,
    pub key_id: String,
    pub base_directory: String,
    pub key_path: PathBuf,
}

impl MantaConfig {
    /// Resolves settings from the process environment and `conf`.
    pub fn from_env(conf: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::resolve(conf, |name| std::env::var(name).ok())
    }

    /// Resolves settings from `conf`, letting `MANTA_URL`, `MANTA_USER`
    /// and `MANTA_KEY_ID` (read through `env`) override `endpoint`,
    /// `user` and `keyid`. Empty values count as unset.
    pub fn resolve<F>(conf: &HashMap<String, String>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str, key: &'static str| -> Result<String, ConfigError> {
            env(var)
                .filter(|v| !v.is_empty())
                .or_else(|| conf.get(key).filter(|v| !v.is_empty()).cloned())
                .ok_or(ConfigError::Missing(key))
        };

        let endpoint = lookup(ENV_URL, "endpoint")?;
        let user = lookup(ENV_USER, "user")?;
        let key_id = lookup(ENV_KEY_ID, "keyid")?;
        let base_directory = conf
            .get("path")
            .cloned()
            .ok_or(ConfigError::Missing("path"))?;

        let endpoint = Url::parse(&endpoint).map_err(|e| ConfigError::Endpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ConfigError::Endpoint {
                endpoint: endpoint.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let key_path = match conf.get("keypath") {
            Some(path) => PathBuf::from(path),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_KEY_FILE),
        };

        Ok(Self {
            endpoint,
            user,
            key_id,
            base_directory,
            key_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn resolves_from_map() {
        let config = MantaConfig::resolve(
            &conf(&[
                ("endpoint", "https://us-east.manta.example.com"),
                ("user", "alice"),
                ("keyid", "aa:bb:cc"),
                ("path", "vault"),
                ("keypath", "/etc/objkv/id_rsa"),
            ]),
            no_env,
        )
        .unwrap();

        assert_eq!(config.endpoint.as_str(), "https://us-east.manta.example.com/");
        assert_eq!(config.user, "alice");
        assert_eq!(config.key_id, "aa:bb:cc");
        assert_eq!(config.base_directory, "vault");
        assert_eq!(config.key_path, PathBuf::from("/etc/objkv/id_rsa"));
    }

    #[test]
    fn environment_takes_precedence() {
        let env = |name: &str| match name {
            ENV_URL => Some("https://env.example.com".to_string()),
            ENV_USER => Some("env-user".to_string()),
            ENV_KEY_ID => Some(String::new()),
            _ => None,
        };
        let config = MantaConfig::resolve(
            &conf(&[
                ("endpoint", "https://conf.example.com"),
                ("user", "conf-user"),
                ("keyid", "conf-key"),
                ("path", "vault"),
            ]),
            env,
        )
        .unwrap();

        assert_eq!(config.endpoint.host_str(), Some("env.example.com"));
        assert_eq!(config.user, "env-user");
        assert_eq!(config.key_id, "conf-key");
        assert!(config.key_path.ends_with(".ssh/id_rsa"));
    }

    #[test]
    fn missing_fields_are_named() {
        let full = [
            ("endpoint", "https://manta.example.com"),
            ("user", "alice"),
            ("keyid", "aa:bb"),
            ("path", "vault"),
        ];
        for (skip, _) in full {
            let partial: Vec<_> = full.iter().copied().filter(|(k, _)| *k != skip).collect();
            let err = MantaConfig::resolve(&conf(&partial), no_env).unwrap_err();
            assert_eq!(err.to_string(), format!("'{skip}' must be set"));
        }
    }

    #[test]
    fn rejects_relative_endpoint() {
        let err = MantaConfig::resolve(
            &conf(&[
                ("endpoint", "manta.example.com"),
                ("user", "alice"),
                ("keyid", "aa:bb"),
                ("path", "vault"),
            ]),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Endpoint { .. }));
    }
}
