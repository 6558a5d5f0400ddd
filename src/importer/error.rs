// ==========================================
// 贸易产品目录 - 导入模块错误类型
// ==========================================
// 职责: 整体导入失败（致命错误）
// 行级错误不走这里，见 domain::import::ValidationError
// ==========================================

use thiserror::Error;

/// 导入模块错误类型（致命，整次导入中止）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误 =====
    #[error("Excel 文件无工作表")]
    MissingSheet,

    #[error("文件缺少表头行")]
    MissingHeader,

    #[error("表头缺少必填列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== 依赖数据错误 =====
    #[error("参考目录读取失败: {0}")]
    CatalogUnavailable(String),

    #[error("产品库读取失败: {0}")]
    StoreUnavailable(String),

    // ===== 配置错误 =====
    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名（致命错误）
pub type PipelineResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err =
            ImportError::MissingColumns(vec!["name".to_string(), "package_type".to_string()]);
        assert_eq!(err.to_string(), "表头缺少必填列: name, package_type");
    }

    #[test]
    fn test_io_error_is_file_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xlsx");
        let err: ImportError = io.into();
        assert!(matches!(err, ImportError::FileReadError(msg) if msg.contains("missing.xlsx")));
    }
}
