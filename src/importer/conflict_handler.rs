// ==========================================
// 贸易产品目录 - 冲突处理器实现
// ==========================================
// 职责: 检测文件内 / 产品库内重复身份键
// 策略: 文件内首次出现者保留；重复一律拒绝，不合并
// ==========================================

use crate::domain::import::{RowOutcome, ValidationError};
use crate::domain::product::{IdentityKey, ProductDraft};
use crate::i18n::{t, t_with_args};
use crate::importer::product_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::{HashMap, HashSet};

/// 重复错误的 field
pub const DUPLICATE_FIELD: &str = "duplicate";

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    /// 检测文件内重复
    ///
    /// # 返回
    /// - Vec<(行号, 首次出现行号)>: 不包括第一次出现
    fn detect_in_file_duplicates(&self, drafts: &[&ProductDraft]) -> Vec<(usize, usize)> {
        let mut first_occurrence: HashMap<IdentityKey, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for draft in drafts {
            let key = draft.identity_key();
            match first_occurrence.get(&key) {
                Some(first_row) => duplicates.push((draft.row_number, *first_row)),
                None => {
                    first_occurrence.insert(key, draft.row_number);
                }
            }
        }

        duplicates
    }

    /// 检测与产品库重复
    fn detect_catalog_duplicates(
        &self,
        drafts: &[&ProductDraft],
        existing_keys: &HashSet<IdentityKey>,
    ) -> Vec<usize> {
        drafts
            .iter()
            .filter(|draft| existing_keys.contains(&draft.identity_key()))
            .map(|draft| draft.row_number)
            .collect()
    }

    fn resolve(
        &self,
        outcomes: Vec<RowOutcome>,
        existing_keys: &HashSet<IdentityKey>,
    ) -> Vec<RowOutcome> {
        let (in_file, in_catalog) = {
            let drafts: Vec<&ProductDraft> =
                outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
            let in_file: HashMap<usize, usize> =
                self.detect_in_file_duplicates(&drafts).into_iter().collect();
            let in_catalog: HashSet<usize> = self
                .detect_catalog_duplicates(&drafts, existing_keys)
                .into_iter()
                .collect();
            (in_file, in_catalog)
        };

        outcomes
            .into_iter()
            .map(|outcome| {
                let draft = outcome?;
                let row = draft.row_number;

                if let Some(first_row) = in_file.get(&row) {
                    return Err(ValidationError::new(
                        row,
                        DUPLICATE_FIELD,
                        t_with_args(
                            "import.duplicate_in_file",
                            &[("first_row", &first_row.to_string())],
                        ),
                    ));
                }
                if in_catalog.contains(&row) {
                    return Err(ValidationError::new(
                        row,
                        DUPLICATE_FIELD,
                        t("import.duplicate_in_catalog"),
                    ));
                }
                Ok(draft)
            })
            .collect()
    }
}
