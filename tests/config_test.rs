// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证导入配置读取功能的正确性
// ==========================================


use trade_catalog_import::config::{
    config_keys, ConfigManager, ImportConfigReader, DEFAULT_COMMIT_BATCH_SIZE,
    DEFAULT_ERROR_PREVIEW_LIMIT,
};
use test_helpers::create_test_db;

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_defaults_when_unset() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let config = config_manager.load_import_config().await.unwrap();
    assert_eq!(config.commit_batch_size, DEFAULT_COMMIT_BATCH_SIZE);
    assert_eq!(config.error_preview_limit, DEFAULT_ERROR_PREVIEW_LIMIT);
    assert_eq!(config.error_artifact_dir, None);
}

#[tokio::test]
async fn test_values_persist_across_instances() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    {
        let writer = ConfigManager::new(&db_path).unwrap();
        writer
            .set_global_config_value(config_keys::COMMIT_BATCH_SIZE, "25")
            .unwrap();
        writer
            .set_global_config_value(config_keys::ERROR_ARTIFACT_DIR, "/tmp/import-errors")
            .unwrap();
        // 覆盖写
        writer
            .set_global_config_value(config_keys::COMMIT_BATCH_SIZE, "50")
            .unwrap();
    }

    let reader = ConfigManager::new(&db_path).unwrap();
    let config = reader.load_import_config().await.unwrap();
    assert_eq!(config.commit_batch_size, 50);
    assert_eq!(
        config.error_artifact_dir.as_deref(),
        Some(std::path::Path::new("/tmp/import-errors"))
    );

    let snapshot = reader.get_config_snapshot().unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[config_keys::COMMIT_BATCH_SIZE], "50");
}

#[tokio::test]
async fn test_invalid_and_zero_batch_size() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager
        .set_global_config_value(config_keys::COMMIT_BATCH_SIZE, "abc")
        .unwrap();
    assert_eq!(
        config_manager.get_commit_batch_size().await.unwrap(),
        DEFAULT_COMMIT_BATCH_SIZE
    );

    config_manager
        .set_global_config_value(config_keys::COMMIT_BATCH_SIZE, "0")
        .unwrap();
    assert_eq!(config_manager.get_commit_batch_size().await.unwrap(), 1);
}
