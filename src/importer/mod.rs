// ==========================================
// 贸易产品目录 - 导入层
// ==========================================
// 职责: 上传表格 → 校验、去重后的产品记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod commit_batcher;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod product_validator;
pub mod reference_catalog;
pub mod result_reporter;

// 重导出核心类型
pub use commit_batcher::CommitBatcher;
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, PipelineResult};
pub use field_mapper::{ColumnMap, FieldMapper as FieldMapperImpl, ProductColumn};
pub use file_parser::{CsvParser, ExcelParser, ParsedSheet, SheetRecord, UniversalFileParser};
pub use product_importer_impl::ProductImporterImpl;
pub use product_validator::ProductValidator as ProductValidatorImpl;
pub use reference_catalog::{RefResolution, ReferenceCatalog};
pub use result_reporter::ResultReporter;

// 重导出 Trait 接口
pub use product_importer_trait::{
    ConflictHandler, DataCleaner, FieldMapper, FileParser, ProductImporter, ProductValidator,
};
