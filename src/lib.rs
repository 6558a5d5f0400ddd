// ==========================================
// 贸易产品目录 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 产品批量导入管道（表格 → 校验、去重后的产品记录）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格导入管道
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 调用入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    BatchOutcome, Brand, Category, IdentityKey, ImportBatchRecord, ImportResult, PriceTrend,
    ProductDraft, ProductStatus, RawRow, ValidationError,
};

// 导入器
pub use importer::{ImportError, ProductImporter, ProductImporterImpl};

// 配置
pub use config::{ConfigManager, ImportConfig, ImportConfigReader};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "贸易产品目录导入";
