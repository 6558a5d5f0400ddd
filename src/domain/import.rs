// ==========================================
// 贸易产品目录 - 导入领域模型
// ==========================================
// 职责: 导入管道中间产物与返回结构
// RawRow → RowOutcome → BatchOutcome → ImportResult
// ==========================================

use crate::domain::product::ProductDraft;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RawRow - 单行原始单元格
// ==========================================
// 空单元格一律为 None（不会出现 Some("")）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,

    pub name: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub brand_id: Option<String>,
    pub brand_name: Option<String>,
    pub spec_weight: Option<String>,
    pub package_type: Option<String>,
    pub applicable_scenes: Option<String>,
    pub moq: Option<String>,
    pub supply_area: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub price_trend: Option<String>,
    pub latest_price_updated_at: Option<String>,
    pub latest_price_note: Option<String>,
}

// ==========================================
// ValidationError - 行级错误
// ==========================================
// 一行最多产生一条
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 单行在管道中的处理结果
pub type RowOutcome = Result<ProductDraft, ValidationError>;

/// 结果对应的源文件行号
pub fn outcome_row(outcome: &RowOutcome) -> usize {
    match outcome {
        Ok(draft) => draft.row_number,
        Err(error) => error.row,
    }
}

// ==========================================
// BatchOutcome - 单批次提交结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub index: usize,     // 批次序号（从 1 开始）
    pub first_row: usize, // 批次首行行号
    pub last_row: usize,  // 批次末行行号
    pub rows: usize,      // 批次行数
    pub status: BatchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchStatus {
    Committed { inserted: usize },
    Failed { reason: String },
}

impl BatchOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self.status, BatchStatus::Committed { .. })
    }
}

// ==========================================
// ImportResult - 导入结果（返回调用方）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<ValidationError>,
    #[serde(
        rename = "errorArtifactRef",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub error_artifact_ref: Option<String>,

    // 分批提交明细（不进入对外契约）
    #[serde(skip)]
    pub batches: Vec<BatchOutcome>,
}

// ==========================================
// ImportBatchRecord - 导入批次审计记录
// ==========================================
// 仅提交模式写入 product_import_batch 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportBatchRecord {
    pub batch_id: String,
    pub total_rows: usize,
    pub success_rows: usize,
    pub failed_rows: usize,
    pub committed_batches: usize,
    pub failed_batches: usize,
    pub error_artifact_ref: Option<String>,
    pub elapsed_ms: i64,
    pub imported_at: DateTime<Utc>,
}

// ==========================================
// ImportStage - 导入状态机
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    LoadingCatalog,
    Parsing,
    Validating,
    Deduplicating,
    Committing,
    Reporting,
    Completed,
    Aborted,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportStage::LoadingCatalog => "loading_catalog",
            ImportStage::Parsing => "parsing",
            ImportStage::Validating => "validating",
            ImportStage::Deduplicating => "deduplicating",
            ImportStage::Committing => "committing",
            ImportStage::Reporting => "reporting",
            ImportStage::Completed => "completed",
            ImportStage::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_result_json_shape() {
        let result = ImportResult {
            total: 3,
            success: 2,
            failed: 1,
            errors: vec![ValidationError::new(3, "duplicate", "dup")],
            error_artifact_ref: None,
            batches: Vec::new(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["errors"][0]["row"], 3);
        assert_eq!(value["errors"][0]["field"], "duplicate");
        assert!(value.get("errorArtifactRef").is_none());
        assert!(value.get("batches").is_none());
    }

    #[test]
    fn test_import_result_json_includes_artifact_ref() {
        let result = ImportResult {
            total: 1,
            failed: 1,
            error_artifact_ref: Some("product-import-errors-1.csv".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["errorArtifactRef"], "product-import-errors-1.csv");
    }

    #[test]
    fn test_outcome_row() {
        let err: RowOutcome = Err(ValidationError::new(7, "name", "missing"));
        assert_eq!(outcome_row(&err), 7);
    }
}
