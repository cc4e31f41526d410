use climbate_core::Climbate;
use climbate_core::ClimbateConfig;
use climbate_core::MemoryStore;
use climbate_core::config::StorageConfig;
use climbate_protocol::SafetyStatus;
use core_test_support::FakeCatalog;
use core_test_support::crag;
use core_test_support::numbered_crags;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn components_share_one_catalog_and_saved_set() {
    let mut config = ClimbateConfig::default();
    config.catalog.page_size = 4;
    let catalog = Arc::new(FakeCatalog::default().with_crags(numbered_crags(9)));
    let session = Climbate::with_parts(config, catalog.clone(), Arc::new(MemoryStore::new()));

    let all = session.fetcher().fetch_all().await.unwrap();
    assert_eq!(all.len(), 9);
    assert_eq!(catalog.pages_requested(), vec![1, 2, 3]);

    session
        .saved()
        .save(crag("smith", "Smith Rock", "Oregon", SafetyStatus::Safe));
    assert!(session.saved().contains_id("smith"));
}

#[test]
fn from_config_uses_the_configured_storage_dir() {
    let dir = TempDir::new().unwrap();
    let config = ClimbateConfig {
        storage: StorageConfig {
            dir: Some(dir.path().to_path_buf()),
        },
        ..ClimbateConfig::default()
    };

    let session = Climbate::from_config(config).unwrap();
    session
        .saved()
        .save(crag("rifle", "Rifle", "Colorado", SafetyStatus::Caution));

    assert!(dir.path().join("saved_crags.json").exists());
    assert_eq!(session.config().catalog.request_timeout_secs, 30);
}

#[test]
fn from_config_rejects_an_unusable_base_url() {
    let mut config = ClimbateConfig::default();
    config.catalog.base_url = "not a url".to_string();

    assert!(Climbate::from_config(config).is_err());
}
