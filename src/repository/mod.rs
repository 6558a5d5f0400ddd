// ==========================================
// 贸易产品目录 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod product_import_repo;
pub mod product_import_repo_impl;

// 重导出核心仓储
pub use catalog_repo::{CatalogRepository, CatalogRepositoryImpl};
pub use error::{RepositoryError, RepositoryResult};
pub use product_import_repo::ProductImportRepository;
pub use product_import_repo_impl::ProductImportRepositoryImpl;
