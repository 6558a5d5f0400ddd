// ==========================================
// 贸易产品目录 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod import;
pub mod product;

// 重导出核心类型
pub use import::{
    outcome_row, BatchOutcome, BatchStatus, ImportBatchRecord, ImportResult, ImportStage,
    RawRow, RowOutcome, ValidationError,
};
pub use product::{
    Brand, Category, IdentityKey, PriceTrend, ProductDraft, ProductStatus, RefSelector,
    NO_BRAND_KEY,
};
