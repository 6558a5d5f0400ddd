// ==========================================
// 贸易产品目录 - 产品导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: 只追加写入 products，不做原地更新
// ==========================================

use crate::domain::import::ImportBatchRecord;
use crate::domain::product::{IdentityKey, ProductDraft};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ProductImportRepository Trait
// ==========================================
// 实现者: ProductImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ProductImportRepository: Send + Sync {
    // ===== 查询与校验 =====

    /// 读取已落库产品的身份键（用于跨批次去重）
    async fn list_identity_keys(&self) -> RepositoryResult<Vec<IdentityKey>>;

    /// 统计 products 表记录数
    async fn count_products(&self) -> RepositoryResult<usize>;

    // ===== 批量写入（事务化）=====

    /// 在单个事务中插入一批产品
    ///
    /// # 返回
    /// - Ok(usize): 插入行数
    /// - Err: 数据库错误（整批回滚）
    async fn insert_products_batch(&self, drafts: &[ProductDraft]) -> RepositoryResult<usize>;

    // ===== 批次审计 =====

    /// 写入导入批次记录
    async fn insert_import_batch(&self, record: &ImportBatchRecord) -> RepositoryResult<()>;

    /// 查询最近的导入批次
    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatchRecord>>;
}
