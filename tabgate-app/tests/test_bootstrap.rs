#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::sync::Arc;
use tabgate_app::{build_facade, AppConfig};
use tabgate_core::mock_host::MockHost;
use tempfile::TempDir;

fn write_config(dir: &TempDir, manifest: &str) -> AppConfig {
    fs::write(dir.path().join("manifest.json"), manifest).unwrap();
    let config_path = dir.path().join("tabgate.yaml");
    fs::write(&config_path, "manifest: manifest.json\n").unwrap();
    AppConfig::load(&config_path).unwrap()
}

#[tokio::test]
async fn test_build_facade_uses_manifest_declarations() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        &temp_dir,
        r#"{"optional_permissions": ["tabs", "management"]}"#,
    );
    let host = Arc::new(MockHost::new().with_granted(&["management", "history"]));

    let facade = build_facade(&config, host.clone()).await.unwrap();
    let grants = facade.registry().get_all().await.unwrap();

    assert_eq!(grants.len(), 2);
    assert!(grants.is_granted("management"));
    assert!(!grants.is_granted("tabs"));
    assert_eq!(grants.get("history"), None);
    assert_eq!(host.listener_count(), 1);
}

#[tokio::test]
async fn test_build_facade_with_broken_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "{ broken");
    let host = Arc::new(MockHost::new());

    let result = build_facade(&config, host).await;

    let err = result.err().unwrap();
    assert!(err.to_string().contains("Failed to load manifest"));
}
