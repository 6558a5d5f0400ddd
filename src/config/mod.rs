// ==========================================
// 贸易产品目录 - 配置层
// ==========================================
// 职责: 导入配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{
    ImportConfig, ImportConfigReader, DEFAULT_COMMIT_BATCH_SIZE, DEFAULT_ERROR_PREVIEW_LIMIT,
};
