//! Runs against a live Manta deployment when `MANTA_URL`, `MANTA_USER`
//! and `MANTA_KEY_ID` are set; skipped otherwise.

use std::collections::HashMap;

use objkv_core::{Backend, Entry, ObjectStore};
use objkv_manta::config::{ENV_KEY_ID, ENV_URL, ENV_USER};
use objkv_manta::{MantaClient, MantaConfig};

fn live_settings() -> Option<HashMap<String, String>> {
    for var in [ENV_URL, ENV_USER, ENV_KEY_ID] {
        if std::env::var(var).map(|v| v.is_empty()).unwrap_or(true) {
            return None;
        }
    }
    let bucket = format!("objkv-manta-testacc-{}", uuid::Uuid::new_v4());
    Some(HashMap::from([("path".to_string(), bucket)]))
}

#[tokio::test]
async fn manta_backend() {
    let Some(conf) = live_settings() else {
        eprintln!("skipping: Manta credentials not set");
        return;
    };

    let config = MantaConfig::from_env(&conf).unwrap();
    let client = MantaClient::new(&config).unwrap();
    client.put_directory(&config.base_directory).await.unwrap();

    let backend = objkv_manta::new_backend(&conf).unwrap();

    let result = async {
        backend
            .put(&Entry::new("secret/foo", vec![0x01, 0x02]))
            .await?;
        assert_eq!(
            backend.get("secret/foo").await?.map(|e| e.value),
            Some(vec![0x01, 0x02])
        );
        assert_eq!(backend.list("secret/").await?, vec!["foo"]);

        backend.put(&Entry::new("a/b/c", b"deep".to_vec())).await?;
        assert_eq!(backend.list("").await?, vec!["a/", "secret/"]);
        backend.delete("a").await?;
        assert!(backend.get("a/b/c").await?.is_none());

        backend.delete("secret/foo").await?;
        backend.delete("secret/foo").await?;
        assert!(backend.get("secret/foo").await?.is_none());
        Ok::<_, objkv_core::BackendError>(())
    }
    .await;

    // Objects must go before the bucket itself can be removed.
    backend.remove_tree("").await.unwrap();
    result.unwrap();
}
