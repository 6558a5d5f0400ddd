// ==========================================
// 贸易产品目录 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认提交批大小
pub const DEFAULT_COMMIT_BATCH_SIZE: usize = 100;

/// 默认错误预览条数
pub const DEFAULT_ERROR_PREVIEW_LIMIT: usize = 100;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、ImportConfig（内存常量）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取提交批大小
    ///
    /// # 默认值
    /// - 100（最小 1）
    async fn get_commit_batch_size(&self) -> RepositoryResult<usize>;

    /// 获取结果中直接返回的错误条数上限
    ///
    /// # 默认值
    /// - 100
    async fn get_error_preview_limit(&self) -> RepositoryResult<usize>;

    /// 获取错误明细文件输出目录
    ///
    /// # 返回
    /// - None: 不生成错误明细文件
    async fn get_error_artifact_dir(&self) -> RepositoryResult<Option<PathBuf>>;

    /// 一次性读取全部导入配置
    async fn load_import_config(&self) -> RepositoryResult<ImportConfig> {
        Ok(ImportConfig {
            commit_batch_size: self.get_commit_batch_size().await?,
            error_preview_limit: self.get_error_preview_limit().await?,
            error_artifact_dir: self.get_error_artifact_dir().await?,
        })
    }
}

// ==========================================
// ImportConfig - 单次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub commit_batch_size: usize,
    pub error_preview_limit: usize,
    #[serde(default)]
    pub error_artifact_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            commit_batch_size: DEFAULT_COMMIT_BATCH_SIZE,
            error_preview_limit: DEFAULT_ERROR_PREVIEW_LIMIT,
            error_artifact_dir: None,
        }
    }
}

#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_commit_batch_size(&self) -> RepositoryResult<usize> {
        Ok(self.commit_batch_size.max(1))
    }

    async fn get_error_preview_limit(&self) -> RepositoryResult<usize> {
        Ok(self.error_preview_limit)
    }

    async fn get_error_artifact_dir(&self) -> RepositoryResult<Option<PathBuf>> {
        Ok(self.error_artifact_dir.clone())
    }
}
