// ==========================================
// 贸易产品目录 - API 层
// ==========================================
// 职责: 提供导入 API 接口，供 HTTP 层或命令行调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
