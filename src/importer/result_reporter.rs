// ==========================================
// 贸易产品目录 - 导入结果汇总
// ==========================================
// 职责: 行结果 → ImportResult；错误过多时输出错误明细 CSV
// 红线: 明细文件写入失败只记录日志，不影响导入结果
// ==========================================

use crate::domain::import::{BatchOutcome, ImportResult, RowOutcome, ValidationError};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// 错误明细文件名前缀
pub const ERROR_ARTIFACT_PREFIX: &str = "product-import-errors-";

pub struct ResultReporter {
    preview_limit: usize,
    artifact_dir: Option<PathBuf>,
}

impl ResultReporter {
    pub fn new(preview_limit: usize, artifact_dir: Option<PathBuf>) -> Self {
        Self {
            preview_limit,
            artifact_dir,
        }
    }

    /// 汇总行结果
    ///
    /// total = success + failed，每行只计一次
    pub fn build_result(
        &self,
        outcomes: Vec<RowOutcome>,
        batches: Vec<BatchOutcome>,
    ) -> ImportResult {
        let total = outcomes.len();
        let mut errors: Vec<ValidationError> =
            outcomes.into_iter().filter_map(|o| o.err()).collect();
        errors.sort_by_key(|e| e.row);

        let failed = errors.len();
        let success = total - failed;

        let error_artifact_ref = match (&self.artifact_dir, failed > 0) {
            (Some(dir), true) => match write_error_artifact(dir, &errors) {
                Ok(name) => {
                    info!(artifact = %name, failed, "错误明细已输出");
                    Some(name)
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "错误明细输出失败");
                    None
                }
            },
            _ => None,
        };

        errors.truncate(self.preview_limit);

        ImportResult {
            total,
            success,
            failed,
            errors,
            error_artifact_ref,
            batches,
        }
    }
}

/// 错误明细文件名（按内容确定，相同错误列表得到相同文件名）
pub fn error_artifact_name(errors: &[ValidationError]) -> String {
    let mut hasher = DefaultHasher::new();
    errors.hash(&mut hasher);
    format!("{}{:016x}.csv", ERROR_ARTIFACT_PREFIX, hasher.finish())
}

/// 写出错误明细 CSV（row,field,message；带 BOM 便于表格软件识别编码）
///
/// # 返回
/// - Ok(文件名)
pub fn write_error_artifact(dir: &Path, errors: &[ValidationError]) -> anyhow::Result<String> {
    std::fs::create_dir_all(dir)?;

    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(["row", "field", "message"])?;
        for error in errors {
            writer.write_record([
                error.row.to_string().as_str(),
                error.field.as_str(),
                error.message.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    let name = error_artifact_name(errors);
    std::fs::write(dir.join(&name), buffer)?;
    Ok(name)
}
