// ==========================================
// 贸易产品目录 - 文件解析器实现
// ==========================================
// 职责: 上传字节 → 表头 + 数据行
// 支持: Excel (.xlsx/.xls) / CSV (.csv)，按文件内容识别格式
// 行号: 表头为第 1 行，空白行跳过但不重新编号
// ==========================================

use crate::importer::error::{ImportError, PipelineResult};
use crate::importer::product_importer_trait::FileParser;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use chrono::Timelike;
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

const XLSX_MAGIC: &[u8] = b"PK\x03\x04";
const XLS_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// ==========================================
// 解析结果
// ==========================================

/// 一行数据（单元格按列位置存放，已 TRIM）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub row_number: usize,
    pub cells: Vec<String>,
}

impl SheetRecord {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|s| s.as_str())
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// 单个工作表的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub records: Vec<SheetRecord>,
}

/// 文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Xls,
    Csv,
}

/// 按文件头识别格式
///
/// 非 Excel 魔数且含 NUL 字节的内容视为不支持的二进制文件
pub fn detect_format(bytes: &[u8]) -> PipelineResult<FileFormat> {
    if bytes.starts_with(XLSX_MAGIC) {
        return Ok(FileFormat::Xlsx);
    }
    if bytes.starts_with(XLS_MAGIC) {
        return Ok(FileFormat::Xls);
    }
    if bytes.contains(&0) {
        return Err(ImportError::UnsupportedFormat(
            "无法识别的二进制文件".to_string(),
        ));
    }
    Ok(FileFormat::Csv)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> PipelineResult<ParsedSheet> {
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        let mut sheet = ParsedSheet::default();
        let mut header_seen = false;

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            if !header_seen {
                // 表头之前的空白行不计入数据
                if cells.iter().all(|c| c.is_empty()) {
                    continue;
                }
                sheet.headers = cells;
                header_seen = true;
                continue;
            }

            let record = SheetRecord { row_number, cells };
            if record.is_blank() {
                continue;
            }
            sheet.records.push(record);
        }

        if !header_seen {
            return Err(ImportError::MissingHeader);
        }

        debug!(rows = sheet.records.len(), "CSV 解析完成");
        Ok(sheet)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    format: FileFormat,
}

impl ExcelParser {
    pub fn xlsx() -> Self {
        Self {
            format: FileFormat::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            format: FileFormat::Xls,
        }
    }

    fn read_first_sheet<R: Reader<Cursor<Vec<u8>>>>(workbook: &mut R) -> PipelineResult<Range<Data>>
    where
        R::Error: std::fmt::Display,
    {
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::MissingSheet)?;

        workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))
    }

    /// 单元格转文本
    ///
    /// - 整数值浮点 → 去掉小数部分（999.0 → "999"）
    /// - 日期 → YYYY-MM-DD（含时间时附带 HH:MM:SS）
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) if ndt.num_seconds_from_midnight() == 0 => {
                    ndt.format("%Y-%m-%d").to_string()
                }
                Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => dt.as_f64().to_string(),
            },
            other => other.to_string().trim().to_string(),
        }
    }

    fn range_to_sheet(range: &Range<Data>) -> PipelineResult<ParsedSheet> {
        // range 起点不一定在 A1，行号需加上偏移
        let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

        let mut sheet = ParsedSheet::default();
        let mut header_seen = false;

        for (offset, row) in range.rows().enumerate() {
            let cells: Vec<String> = row.iter().map(Self::cell_to_string).collect();

            if !header_seen {
                if cells.iter().all(|c| c.is_empty()) {
                    continue;
                }
                sheet.headers = cells;
                header_seen = true;
                continue;
            }

            let record = SheetRecord {
                row_number: first_row + offset,
                cells,
            };
            if record.is_blank() {
                continue;
            }
            sheet.records.push(record);
        }

        if !header_seen {
            return Err(ImportError::MissingHeader);
        }
        Ok(sheet)
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> PipelineResult<ParsedSheet> {
        let cursor = Cursor::new(bytes.to_vec());

        let range = match self.format {
            FileFormat::Xls => {
                let mut workbook: Xls<_> = open_workbook_from_rs(cursor)
                    .map_err(|e: calamine::XlsError| ImportError::ExcelParseError(e.to_string()))?;
                Self::read_first_sheet(&mut workbook)?
            }
            _ => {
                let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
                    .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;
                Self::read_first_sheet(&mut workbook)?
            }
        };

        let sheet = Self::range_to_sheet(&range)?;
        debug!(rows = sheet.records.len(), "Excel 解析完成");
        Ok(sheet)
    }
}

// ==========================================
// 通用文件解析器（按内容分派）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_bytes(&self, bytes: &[u8]) -> PipelineResult<ParsedSheet> {
        match detect_format(bytes)? {
            FileFormat::Xlsx => ExcelParser::xlsx().parse_bytes(bytes),
            FileFormat::Xls => ExcelParser::xls().parse_bytes(bytes),
            FileFormat::Csv => CsvParser.parse_bytes(bytes),
        }
    }
}
