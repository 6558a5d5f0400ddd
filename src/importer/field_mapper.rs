// ==========================================
// 贸易产品目录 - 字段映射器实现
// ==========================================
// 职责: 表头识别（英文键 / 中文模板列名）+ 行 → RawRow
// 红线: 只做映射，不做校验
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::error::{ImportError, PipelineResult};
use crate::importer::file_parser::SheetRecord;
use crate::importer::product_importer_trait::FieldMapper as FieldMapperTrait;
use std::collections::HashMap;

// ==========================================
// ProductColumn - 标准列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductColumn {
    Name,
    CategoryId,
    CategoryName,
    BrandId,
    BrandName,
    SpecWeight,
    PackageType,
    ApplicableScenes,
    Moq,
    SupplyArea,
    Description,
    Status,
    PriceTrend,
    LatestPriceUpdatedAt,
    LatestPriceNote,
}

impl ProductColumn {
    pub const ALL: [ProductColumn; 15] = [
        ProductColumn::Name,
        ProductColumn::CategoryId,
        ProductColumn::CategoryName,
        ProductColumn::BrandId,
        ProductColumn::BrandName,
        ProductColumn::SpecWeight,
        ProductColumn::PackageType,
        ProductColumn::ApplicableScenes,
        ProductColumn::Moq,
        ProductColumn::SupplyArea,
        ProductColumn::Description,
        ProductColumn::Status,
        ProductColumn::PriceTrend,
        ProductColumn::LatestPriceUpdatedAt,
        ProductColumn::LatestPriceNote,
    ];

    /// 表头缺失即整体失败的列
    pub const REQUIRED: [ProductColumn; 3] = [
        ProductColumn::Name,
        ProductColumn::SpecWeight,
        ProductColumn::PackageType,
    ];

    /// 英文键（也是行级错误中的 field）
    pub fn key(&self) -> &'static str {
        match self {
            ProductColumn::Name => "name",
            ProductColumn::CategoryId => "category_id",
            ProductColumn::CategoryName => "category_name",
            ProductColumn::BrandId => "brand_id",
            ProductColumn::BrandName => "brand_name",
            ProductColumn::SpecWeight => "spec_weight",
            ProductColumn::PackageType => "package_type",
            ProductColumn::ApplicableScenes => "applicable_scenes",
            ProductColumn::Moq => "moq",
            ProductColumn::SupplyArea => "supply_area",
            ProductColumn::Description => "description",
            ProductColumn::Status => "status",
            ProductColumn::PriceTrend => "price_trend",
            ProductColumn::LatestPriceUpdatedAt => "latest_price_updated_at",
            ProductColumn::LatestPriceNote => "latest_price_note",
        }
    }

    /// 中文模板列名
    pub fn label(&self) -> &'static str {
        match self {
            ProductColumn::Name => "产品名称",
            ProductColumn::CategoryId => "分类ID",
            ProductColumn::CategoryName => "分类名称",
            ProductColumn::BrandId => "品牌ID",
            ProductColumn::BrandName => "品牌名称",
            ProductColumn::SpecWeight => "规格重量",
            ProductColumn::PackageType => "包装类型",
            ProductColumn::ApplicableScenes => "适用场景",
            ProductColumn::Moq => "起订量",
            ProductColumn::SupplyArea => "供货区域",
            ProductColumn::Description => "产品描述",
            ProductColumn::Status => "状态",
            ProductColumn::PriceTrend => "价格走势",
            ProductColumn::LatestPriceUpdatedAt => "价格更新日期",
            ProductColumn::LatestPriceNote => "价格备注",
        }
    }

    /// 表头文本 → 标准列（忽略大小写与必填标记 *）
    pub fn from_header(header: &str) -> Option<ProductColumn> {
        let normalized = header.trim().trim_end_matches('*').trim();
        if normalized.is_empty() {
            return None;
        }

        Self::ALL.iter().copied().find(|column| {
            column.key().eq_ignore_ascii_case(normalized) || column.label() == normalized
        })
    }
}

/// 标准列 → 列位置
pub type ColumnMap = HashMap<ProductColumn, usize>;

// ==========================================
// FieldMapper 实现
// ==========================================
pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn resolve_columns(&self, headers: &[String]) -> PipelineResult<ColumnMap> {
        let mut columns = ColumnMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = ProductColumn::from_header(header) {
                // 重复列名取第一列
                columns.entry(column).or_insert(idx);
            }
        }

        let missing: Vec<String> = ProductColumn::REQUIRED
            .iter()
            .filter(|c| !columns.contains_key(*c))
            .map(|c| c.key().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        Ok(columns)
    }

    fn map_to_raw_row(&self, record: &SheetRecord, columns: &ColumnMap) -> RawRow {
        let get = |column: ProductColumn| -> Option<String> {
            columns
                .get(&column)
                .and_then(|idx| record.cell(*idx))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        RawRow {
            row_number: record.row_number,

            name: get(ProductColumn::Name),
            category_id: get(ProductColumn::CategoryId),
            category_name: get(ProductColumn::CategoryName),
            brand_id: get(ProductColumn::BrandId),
            brand_name: get(ProductColumn::BrandName),
            spec_weight: get(ProductColumn::SpecWeight),
            package_type: get(ProductColumn::PackageType),
            applicable_scenes: get(ProductColumn::ApplicableScenes),
            moq: get(ProductColumn::Moq),
            supply_area: get(ProductColumn::SupplyArea),
            description: get(ProductColumn::Description),
            status: get(ProductColumn::Status),
            price_trend: get(ProductColumn::PriceTrend),
            latest_price_updated_at: get(ProductColumn::LatestPriceUpdatedAt),
            latest_price_note: get(ProductColumn::LatestPriceNote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_header_accepts_key_and_label() {
        assert_eq!(ProductColumn::from_header("name"), Some(ProductColumn::Name));
        assert_eq!(ProductColumn::from_header("Category_ID"), Some(ProductColumn::CategoryId));
        assert_eq!(ProductColumn::from_header("产品名称*"), Some(ProductColumn::Name));
        assert_eq!(ProductColumn::from_header(" 价格走势 "), Some(ProductColumn::PriceTrend));
        assert_eq!(ProductColumn::from_header("备注2"), None);
    }

    #[test]
    fn test_resolve_columns_reports_missing_required() {
        let result = FieldMapper.resolve_columns(&headers(&["name", "category_id"]));
        match result {
            Err(ImportError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["spec_weight", "package_type"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_map_to_raw_row_empty_cells_become_none() {
        let columns = FieldMapper
            .resolve_columns(&headers(&["产品名称", "规格重量", "包装类型", "分类名称", "未知列"]))
            .unwrap();
        let record = SheetRecord {
            row_number: 5,
            cells: vec![
                "大豆油".to_string(),
                "5L".to_string(),
                "".to_string(),
                "粮油".to_string(),
                "ignored".to_string(),
            ],
        };

        let row = FieldMapper.map_to_raw_row(&record, &columns);
        assert_eq!(row.row_number, 5);
        assert_eq!(row.name.as_deref(), Some("大豆油"));
        assert_eq!(row.package_type, None);
        assert_eq!(row.category_name.as_deref(), Some("粮油"));
        assert_eq!(row.brand_id, None);
    }

    #[test]
    fn test_short_row_missing_trailing_cells() {
        let columns = FieldMapper
            .resolve_columns(&headers(&["name", "spec_weight", "package_type", "status"]))
            .unwrap();
        let record = SheetRecord {
            row_number: 2,
            cells: vec!["大豆油".to_string(), "5L".to_string()],
        };
        let row = FieldMapper.map_to_raw_row(&record, &columns);
        assert_eq!(row.status, None);
        assert_eq!(row.package_type, None);
    }
}
