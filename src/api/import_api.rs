// ==========================================
// 产品导入API
// ==========================================
// 职责: 封装产品批量导入相关功能，供上层（HTTP/CLI）调用
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::domain::import::{ImportBatchRecord, ImportResult};
use crate::i18n::t_with_args;
use crate::importer::{ProductImporter, ProductImporterImpl};
use crate::repository::{
    CatalogRepositoryImpl, ProductImportRepository, ProductImportRepositoryImpl,
};
use futures::future::join_all;
use std::path::Path;
use tracing::{info, instrument};

type DefaultProductImporter =
    ProductImporterImpl<CatalogRepositoryImpl, ProductImportRepositoryImpl, ConfigManager>;

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 初始化数据库 schema（幂等）
    pub fn init_database(&self) -> ApiResult<()> {
        let conn = open_sqlite_connection(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let version =
            read_schema_version(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        info!(db_path = %self.db_path, schema_version = ?version, "数据库初始化完成");
        Ok(())
    }

    /// 导入产品数据
    ///
    /// # 参数
    /// - bytes: 上传文件内容（xlsx/xls/csv）
    /// - commit: false 为试运行，只校验不落库
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入结果（行级错误在结果内）
    /// - Err(ApiError): 致命错误
    #[instrument(skip(self, bytes))]
    pub async fn import_products(&self, bytes: &[u8], commit: bool) -> ApiResult<ImportResult> {
        let importer = self.create_importer()?;
        let result = importer.run_import(bytes, commit).await?;
        Ok(result)
    }

    /// 从文件路径导入产品数据
    pub async fn import_products_from_file(
        &self,
        file_path: &str,
        commit: bool,
    ) -> ApiResult<ImportResult> {
        let path = Path::new(file_path);
        if !path.exists() {
            return Err(ApiError::NotFound(t_with_args(
                "import.file_not_found",
                &[("path", file_path)],
            )));
        }

        let importer = self.create_importer()?;
        let result = importer.import_from_file(path, commit).await?;
        Ok(result)
    }

    /// 并发导入多个文件（每个文件独立的目录快照与结果）
    pub async fn import_many(
        &self,
        files: &[Vec<u8>],
        commit: bool,
    ) -> Vec<ApiResult<ImportResult>> {
        info!(count = files.len(), commit, "开始批量导入文件");

        let tasks = files
            .iter()
            .map(|bytes| self.import_products(bytes, commit));
        let results = join_all(tasks).await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        info!(
            count = files.len(),
            succeeded,
            failed = files.len() - succeeded,
            "批量导入完成"
        );
        results
    }

    /// 查询最近的导入批次
    pub async fn list_recent_batches(&self, limit: usize) -> ApiResult<Vec<ImportBatchRecord>> {
        let repo = ProductImportRepositoryImpl::new(&self.db_path)?;
        let batches = repo.get_recent_batches(limit).await?;
        Ok(batches)
    }

    /// 统计产品库记录数
    pub async fn count_products(&self) -> ApiResult<usize> {
        let repo = ProductImportRepositoryImpl::new(&self.db_path)?;
        Ok(repo.count_products().await?)
    }

    /// 创建导入器（每次导入独立连接）
    fn create_importer(&self) -> ApiResult<DefaultProductImporter> {
        let catalog_repo = CatalogRepositoryImpl::new(&self.db_path)?;
        let import_repo = ProductImportRepositoryImpl::new(&self.db_path)?;
        let config = ConfigManager::new(&self.db_path)?;

        Ok(ProductImporterImpl::with_defaults(
            catalog_repo,
            import_repo,
            config,
        ))
    }
}
