// ==========================================
// 贸易产品目录 - 分批提交器
// ==========================================
// 职责: 按固定批大小分批落库，每批一个事务
// 策略: 单批失败整批回滚、该批行转为行级错误，后续批次继续
// 红线: 已提交批次不回滚
// ==========================================

use crate::domain::import::{outcome_row, BatchOutcome, BatchStatus, RowOutcome, ValidationError};
use crate::domain::product::ProductDraft;
use crate::i18n::t_with_args;
use crate::repository::product_import_repo::ProductImportRepository;
use tracing::{info, warn};

/// 提交失败的 field
pub const COMMIT_FIELD: &str = "commit";

pub struct CommitBatcher {
    batch_size: usize,
}

impl CommitBatcher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 提交全部通过去重的草稿
    ///
    /// # 返回
    /// - 按行号排序的最终结果（失败批次的行已转为错误）
    /// - 每批一条 BatchOutcome
    pub async fn commit_all<R>(
        &self,
        repo: &R,
        outcomes: Vec<RowOutcome>,
    ) -> (Vec<RowOutcome>, Vec<BatchOutcome>)
    where
        R: ProductImportRepository + ?Sized,
    {
        let mut finished: Vec<RowOutcome> = Vec::with_capacity(outcomes.len());
        let mut drafts: Vec<ProductDraft> = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(draft) => drafts.push(draft),
                Err(error) => finished.push(Err(error)),
            }
        }

        let mut batches = Vec::new();
        for (idx, chunk) in drafts.chunks(self.batch_size).enumerate() {
            let index = idx + 1;
            let first_row = chunk.first().map(|d| d.row_number).unwrap_or_default();
            let last_row = chunk.last().map(|d| d.row_number).unwrap_or_default();

            match repo.insert_products_batch(chunk).await {
                Ok(inserted) => {
                    info!(
                        batch_index = index,
                        first_row,
                        last_row,
                        inserted,
                        "批次提交成功"
                    );
                    finished.extend(chunk.iter().cloned().map(Ok));
                    batches.push(BatchOutcome {
                        index,
                        first_row,
                        last_row,
                        rows: chunk.len(),
                        status: BatchStatus::Committed { inserted },
                    });
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        batch_index = index,
                        first_row,
                        last_row,
                        error = %reason,
                        "批次提交失败，已回滚"
                    );
                    let message = t_with_args(
                        "import.commit_failed",
                        &[("batch", &index.to_string()), ("reason", &reason)],
                    );
                    finished.extend(chunk.iter().map(|draft| {
                        Err(ValidationError::new(draft.row_number, COMMIT_FIELD, message.clone()))
                    }));
                    batches.push(BatchOutcome {
                        index,
                        first_row,
                        last_row,
                        rows: chunk.len(),
                        status: BatchStatus::Failed { reason },
                    });
                }
            }
        }

        finished.sort_by_key(outcome_row);
        (finished, batches)
    }
}
