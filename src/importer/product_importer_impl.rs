// ==========================================
// 贸易产品目录 - 产品批量导入器实现
// ==========================================
// 职责: 整合导入流程，从上传字节到产品库
// 流程: 参考目录快照 → 解析 → 映射 → 校验 → 去重 → 分批提交 → 汇总
// 状态: LoadingCatalog → Parsing → Validating → Deduplicating
//       → Committing(可选) → Reporting → Completed | Aborted
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportBatchRecord, ImportResult, ImportStage, RawRow, RowOutcome};
use crate::domain::product::IdentityKey;
use crate::importer::commit_batcher::CommitBatcher;
use crate::importer::conflict_handler::ConflictHandler as DefaultConflictHandler;
use crate::importer::error::{ImportError, PipelineResult};
use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::product_importer_trait::{
    ConflictHandler, FieldMapper, FileParser, ProductImporter, ProductValidator,
};
use crate::importer::product_validator::ProductValidator as DefaultProductValidator;
use crate::importer::reference_catalog::ReferenceCatalog;
use crate::importer::result_reporter::ResultReporter;
use crate::repository::{CatalogRepository, ProductImportRepository};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ProductImporterImpl - 产品批量导入器实现
// ==========================================
pub struct ProductImporterImpl<C, P, F>
where
    C: CatalogRepository,
    P: ProductImportRepository,
    F: ImportConfigReader,
{
    // 数据访问层
    catalog_repo: C,
    import_repo: P,

    // 配置读取器
    config: F,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    validator: Box<dyn ProductValidator>,
    conflict_handler: Box<dyn ConflictHandler>,
}

impl<C, P, F> ProductImporterImpl<C, P, F>
where
    C: CatalogRepository,
    P: ProductImportRepository,
    F: ImportConfigReader,
{
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - catalog_repo: 参考目录仓储
    /// - import_repo: 产品导入仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    /// - validator: 行校验器
    /// - conflict_handler: 冲突处理器
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog_repo: C,
        import_repo: P,
        config: F,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        validator: Box<dyn ProductValidator>,
        conflict_handler: Box<dyn ConflictHandler>,
    ) -> Self {
        Self {
            catalog_repo,
            import_repo,
            config,
            file_parser,
            field_mapper,
            validator,
            conflict_handler,
        }
    }

    /// 使用默认组件创建
    pub fn with_defaults(catalog_repo: C, import_repo: P, config: F) -> Self {
        Self::new(
            catalog_repo,
            import_repo,
            config,
            Box::new(UniversalFileParser),
            Box::new(DefaultFieldMapper),
            Box::new(DefaultProductValidator::default()),
            Box::new(DefaultConflictHandler),
        )
    }

    pub fn import_repo(&self) -> &P {
        &self.import_repo
    }

    fn enter(run_id: &str, current: &mut ImportStage, next: ImportStage) {
        debug!(run_id = %run_id, from = %current, to = %next, "导入阶段切换");
        *current = next;
    }

    async fn execute(
        &self,
        run_id: &str,
        stage: &mut ImportStage,
        bytes: &[u8],
        commit: bool,
    ) -> PipelineResult<ImportResult> {
        let start_time = Instant::now();

        // === 阶段 1: 配置与参考目录快照 ===
        let config = self
            .config
            .load_import_config()
            .await
            .map_err(|e| ImportError::ConfigError(e.to_string()))?;
        let catalog = ReferenceCatalog::load(&self.catalog_repo).await?;
        info!(
            run_id = %run_id,
            categories = catalog.category_count(),
            brands = catalog.brand_count(),
            batch_size = config.commit_batch_size,
            "参考目录快照完成"
        );

        // === 阶段 2: 解析与字段映射 ===
        Self::enter(run_id, stage, ImportStage::Parsing);
        let sheet = self.file_parser.parse_bytes(bytes)?;
        let columns = self.field_mapper.resolve_columns(&sheet.headers)?;
        let raw_rows: Vec<RawRow> = sheet
            .records
            .iter()
            .map(|record| self.field_mapper.map_to_raw_row(record, &columns))
            .collect();
        info!(run_id = %run_id, total_rows = raw_rows.len(), "文件解析完成");

        // === 阶段 3: 行校验 ===
        Self::enter(run_id, stage, ImportStage::Validating);
        let outcomes: Vec<RowOutcome> = raw_rows
            .iter()
            .map(|row| self.validator.validate_row(row, &catalog))
            .collect();
        let invalid = outcomes.iter().filter(|o| o.is_err()).count();
        info!(run_id = %run_id, invalid, "行校验完成");

        // === 阶段 4: 去重 ===
        Self::enter(run_id, stage, ImportStage::Deduplicating);
        let existing_keys: HashSet<IdentityKey> = self
            .import_repo
            .list_identity_keys()
            .await
            .map_err(|e| ImportError::StoreUnavailable(e.to_string()))?
            .into_iter()
            .collect();
        let outcomes = self.conflict_handler.resolve(outcomes, &existing_keys);
        let remaining = outcomes.iter().filter(|o| o.is_ok()).count();
        info!(run_id = %run_id, remaining, existing = existing_keys.len(), "去重完成");

        // === 阶段 5: 分批提交（仅提交模式）===
        let (outcomes, batches) = if commit {
            Self::enter(run_id, stage, ImportStage::Committing);
            CommitBatcher::new(config.commit_batch_size)
                .commit_all(&self.import_repo, outcomes)
                .await
        } else {
            debug!(run_id = %run_id, "试运行，跳过提交");
            (outcomes, Vec::new())
        };

        // === 阶段 6: 汇总 ===
        Self::enter(run_id, stage, ImportStage::Reporting);
        let result =
            ResultReporter::new(config.error_preview_limit, config.error_artifact_dir.clone())
                .build_result(outcomes, batches);

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        if commit {
            let record = ImportBatchRecord {
                batch_id: run_id.to_string(),
                total_rows: result.total,
                success_rows: result.success,
                failed_rows: result.failed,
                committed_batches: result.batches.iter().filter(|b| b.is_committed()).count(),
                failed_batches: result.batches.iter().filter(|b| !b.is_committed()).count(),
                error_artifact_ref: result.error_artifact_ref.clone(),
                elapsed_ms,
                imported_at: Utc::now(),
            };
            if let Err(e) = self.import_repo.insert_import_batch(&record).await {
                warn!(run_id = %run_id, error = %e, "导入批次记录写入失败");
            }
        }

        Self::enter(run_id, stage, ImportStage::Completed);
        info!(
            run_id = %run_id,
            commit,
            total_rows = result.total,
            success = result.success,
            failed = result.failed,
            elapsed_ms,
            "导入完成"
        );
        Ok(result)
    }
}

#[async_trait::async_trait]
impl<C, P, F> ProductImporter for ProductImporterImpl<C, P, F>
where
    C: CatalogRepository,
    P: ProductImportRepository,
    F: ImportConfigReader,
{
    #[instrument(skip(self, bytes))]
    async fn run_import(&self, bytes: &[u8], commit: bool) -> PipelineResult<ImportResult> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, commit, size = bytes.len(), "开始导入产品");

        let mut stage = ImportStage::LoadingCatalog;
        match self.execute(&run_id, &mut stage, bytes, commit).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(
                    run_id = %run_id,
                    stage = %stage,
                    to = %ImportStage::Aborted,
                    error = %e,
                    "导入中止"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportConfig;
    use crate::domain::product::{Brand, Category, ProductDraft};
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticCatalog;

    #[async_trait]
    impl CatalogRepository for StaticCatalog {
        async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
            Ok(vec![Category {
                id: 1,
                name: "粮油".to_string(),
            }])
        }

        async fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
            Ok(vec![Brand {
                id: 1,
                name: "金龙鱼".to_string(),
            }])
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        keys: Vec<IdentityKey>,
        inserted: Mutex<Vec<ProductDraft>>,
        audits: Mutex<Vec<ImportBatchRecord>>,
        unavailable: bool,
    }

    #[async_trait]
    impl ProductImportRepository for MemoryStore {
        async fn list_identity_keys(&self) -> RepositoryResult<Vec<IdentityKey>> {
            if self.unavailable {
                return Err(RepositoryError::DatabaseConnectionError("offline".to_string()));
            }
            Ok(self.keys.clone())
        }

        async fn count_products(&self) -> RepositoryResult<usize> {
            Ok(self.inserted.lock().unwrap().len())
        }

        async fn insert_products_batch(&self, drafts: &[ProductDraft]) -> RepositoryResult<usize> {
            self.inserted.lock().unwrap().extend_from_slice(drafts);
            Ok(drafts.len())
        }

        async fn insert_import_batch(&self, record: &ImportBatchRecord) -> RepositoryResult<()> {
            self.audits.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn get_recent_batches(
            &self,
            _limit: usize,
        ) -> RepositoryResult<Vec<ImportBatchRecord>> {
            Ok(self.audits.lock().unwrap().clone())
        }
    }

    fn importer(
        store: MemoryStore,
    ) -> ProductImporterImpl<StaticCatalog, MemoryStore, ImportConfig> {
        ProductImporterImpl::with_defaults(StaticCatalog, store, ImportConfig::default())
    }

    const CSV: &str = "name,category_id,spec_weight,package_type,status\n\
                       大豆油,1,5L,桶装,上架\n\
                       大豆油,1,5L,桶装,1\n\
                       菜籽油,1,5L,桶装,下架\n";

    #[tokio::test]
    async fn test_dry_run_persists_nothing() {
        let importer = importer(MemoryStore::default());
        let result = importer.run_import(CSV.as_bytes(), false).await.unwrap();

        assert_eq!(result.total, 3);
        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(result.errors[0].field, "duplicate");
        assert!(result.batches.is_empty());
        assert!(importer.import_repo().inserted.lock().unwrap().is_empty());
        assert!(importer.import_repo().audits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_persists_and_audits() {
        let importer = importer(MemoryStore::default());
        let result = importer.run_import(CSV.as_bytes(), true).await.unwrap();

        assert_eq!(result.success, 2);
        assert_eq!(result.batches.len(), 1);
        assert_eq!(importer.import_repo().inserted.lock().unwrap().len(), 2);

        let audits = importer.import_repo().audits.lock().unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].total_rows, 3);
        assert_eq!(audits[0].committed_batches, 1);
    }

    #[tokio::test]
    async fn test_store_unavailable_is_fatal() {
        let importer = importer(MemoryStore {
            unavailable: true,
            ..Default::default()
        });
        let result = importer.run_import(CSV.as_bytes(), true).await;
        assert!(matches!(result, Err(ImportError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_existing_key_rejected() {
        let importer = importer(MemoryStore {
            keys: vec![IdentityKey::new("菜籽油", "5L", 1, None)],
            ..Default::default()
        });
        let result = importer.run_import(CSV.as_bytes(), false).await.unwrap();
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors[1].row, 4);
        assert_eq!(result.errors[1].field, "duplicate");
    }
}
