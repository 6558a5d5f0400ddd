// ==========================================
// 贸易产品目录 - 产品导入 Trait 定义
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 解析 → 字段映射 → 清洗校验 → 去重 → 分批提交 → 汇总
// ==========================================

use crate::domain::import::{ImportResult, RawRow, RowOutcome};
use crate::domain::product::{IdentityKey, PriceTrend, ProductDraft, ProductStatus};
use crate::importer::error::PipelineResult;
use crate::importer::field_mapper::ColumnMap;
use crate::importer::file_parser::{ParsedSheet, SheetRecord};
use crate::importer::reference_catalog::ReferenceCatalog;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 产品批量导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 执行一次导入
    ///
    /// # 参数
    /// - bytes: 上传文件的原始字节（xlsx/xls/csv）
    /// - commit: false 时只做校验和去重，不落库
    ///
    /// # 返回
    /// - Ok(ImportResult): 导入结果（含行级错误）
    /// - Err: 致命错误（文件结构、参考目录、产品库读取失败）
    async fn run_import(&self, bytes: &[u8], commit: bool) -> PipelineResult<ImportResult>;

    /// 从文件路径导入
    async fn import_from_file(&self, path: &Path, commit: bool) -> PipelineResult<ImportResult> {
        let bytes = tokio::fs::read(path).await?;
        self.run_import(&bytes, commit).await
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件字节为表头 + 数据行
    ///
    /// # 返回
    /// - Ok(ParsedSheet): 表头与非空数据行（保留物理行号）
    /// - Err: 格式不支持、无工作表、无表头
    fn parse_bytes(&self, bytes: &[u8]) -> PipelineResult<ParsedSheet>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 表头识别与行映射（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 识别表头列
    ///
    /// # 返回
    /// - Ok(ColumnMap): 标准列 → 列位置
    /// - Err(MissingColumns): 缺少必填列
    fn resolve_columns(&self, headers: &[String]) -> PipelineResult<ColumnMap>;

    /// 将一行单元格映射为 RawRow（空单元格 → None）
    fn map_to_raw_row(&self, record: &SheetRecord, columns: &ColumnMap) -> RawRow;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格规范化（阶段 2）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// TRIM + 空字符串 → None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 状态同义词 → 规范值；不在同义词集合内返回 None
    fn parse_status(&self, value: &str) -> Option<ProductStatus>;

    /// 价格走势同义词 → 规范值；不在同义词集合内返回 None
    fn parse_price_trend(&self, value: &str) -> Option<PriceTrend>;

    /// 适用场景按逗号拆分，去空白、去空标签
    fn split_scenes(&self, value: Option<&str>) -> Vec<String>;

    /// 解析价格更新日期
    fn parse_date(&self, value: &str) -> Option<NaiveDate>;
}

// ==========================================
// ProductValidator Trait
// ==========================================
// 用途: 单行校验（阶段 2），首个失败规则即返回
// 实现者: ProductValidator
pub trait ProductValidator: Send + Sync {
    fn validate_row(&self, row: &RawRow, catalog: &ReferenceCatalog) -> RowOutcome;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 身份键去重（阶段 3）
// 实现者: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 检测文件内重复（只与之前的行比较，首次出现者保留）
    ///
    /// # 返回
    /// - Vec<(行号, 首次出现行号)>
    fn detect_in_file_duplicates(&self, drafts: &[&ProductDraft]) -> Vec<(usize, usize)>;

    /// 检测与产品库已有记录的重复
    ///
    /// # 返回
    /// - Vec<行号>
    fn detect_catalog_duplicates(
        &self,
        drafts: &[&ProductDraft],
        existing_keys: &HashSet<IdentityKey>,
    ) -> Vec<usize>;

    /// 将重复的草稿替换为行级错误（文件内重复优先）
    fn resolve(
        &self,
        outcomes: Vec<RowOutcome>,
        existing_keys: &HashSet<IdentityKey>,
    ) -> Vec<RowOutcome>;
}
