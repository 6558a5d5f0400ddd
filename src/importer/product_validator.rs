// ==========================================
// 贸易产品目录 - 产品行校验器实现
// ==========================================
// 职责: RawRow + 参考目录 → ProductDraft | ValidationError
// 规则顺序: 名称 → 规格重量 → 包装类型 → 分类 → 品牌 → 状态 → 价格走势 → 场景 → 日期
// 红线: 首个失败规则即返回，一行最多一条错误
// ==========================================

use crate::domain::import::{RawRow, RowOutcome, ValidationError};
use crate::domain::product::{Brand, Category, ProductDraft, ProductStatus, RefSelector};
use crate::i18n::{t, t_with_args};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::ProductColumn;
use crate::importer::product_importer_trait::{
    DataCleaner as DataCleanerTrait, ProductValidator as ProductValidatorTrait,
};
use crate::importer::reference_catalog::{RefResolution, ReferenceCatalog};

pub struct ProductValidator {
    cleaner: Box<dyn DataCleanerTrait>,
}

impl ProductValidator {
    pub fn new(cleaner: Box<dyn DataCleanerTrait>) -> Self {
        Self { cleaner }
    }

    fn required(
        &self,
        row: &RawRow,
        column: ProductColumn,
        value: &Option<String>,
    ) -> Result<String, ValidationError> {
        self.cleaner.normalize_null(value.as_deref()).ok_or_else(|| {
            let label = t(&format!("column.{}", column.key()));
            ValidationError::new(
                row.row_number,
                column.key(),
                t_with_args("import.field_required", &[("field", &label)]),
            )
        })
    }

    fn category(
        &self,
        row: &RawRow,
        catalog: &ReferenceCatalog,
    ) -> Result<Category, ValidationError> {
        let selector =
            RefSelector::from_cells(row.category_id.as_deref(), row.category_name.as_deref());
        match catalog.resolve_category(&selector) {
            RefResolution::Found(category) => Ok(category.clone()),
            RefResolution::UnknownId(id) => Err(ValidationError::new(
                row.row_number,
                ProductColumn::CategoryId.key(),
                t_with_args("import.category_id_not_found", &[("value", &id)]),
            )),
            RefResolution::UnknownName(name) => Err(ValidationError::new(
                row.row_number,
                ProductColumn::CategoryName.key(),
                t_with_args("import.category_name_not_found", &[("value", &name)]),
            )),
            RefResolution::Unspecified => Err(ValidationError::new(
                row.row_number,
                ProductColumn::CategoryId.key(),
                t("import.category_required"),
            )),
        }
    }

    fn brand(
        &self,
        row: &RawRow,
        catalog: &ReferenceCatalog,
    ) -> Result<Option<Brand>, ValidationError> {
        let selector = RefSelector::from_cells(row.brand_id.as_deref(), row.brand_name.as_deref());
        match catalog.resolve_brand(&selector) {
            RefResolution::Found(brand) => Ok(Some(brand.clone())),
            RefResolution::UnknownId(id) => Err(ValidationError::new(
                row.row_number,
                ProductColumn::BrandId.key(),
                t_with_args("import.brand_id_not_found", &[("value", &id)]),
            )),
            RefResolution::UnknownName(name) => Err(ValidationError::new(
                row.row_number,
                ProductColumn::BrandName.key(),
                t_with_args("import.brand_name_not_found", &[("value", &name)]),
            )),
            RefResolution::Unspecified => Ok(None),
        }
    }

    fn check(
        &self,
        row: &RawRow,
        catalog: &ReferenceCatalog,
    ) -> Result<ProductDraft, ValidationError> {
        let name = self.required(row, ProductColumn::Name, &row.name)?;
        let spec_weight = self.required(row, ProductColumn::SpecWeight, &row.spec_weight)?;
        let package_type = self.required(row, ProductColumn::PackageType, &row.package_type)?;

        // id 优先于名称，二者不一致时不做交叉校验
        let category = self.category(row, catalog)?;
        let brand = self.brand(row, catalog)?;

        let status = match row.status.as_deref() {
            None => ProductStatus::default(),
            Some(raw) => self.cleaner.parse_status(raw).ok_or_else(|| {
                ValidationError::new(
                    row.row_number,
                    ProductColumn::Status.key(),
                    t_with_args("import.invalid_status", &[("value", raw)]),
                )
            })?,
        };

        let price_trend = match row.price_trend.as_deref() {
            None => None,
            Some(raw) => Some(self.cleaner.parse_price_trend(raw).ok_or_else(|| {
                ValidationError::new(
                    row.row_number,
                    ProductColumn::PriceTrend.key(),
                    t_with_args("import.invalid_price_trend", &[("value", raw)]),
                )
            })?),
        };

        let applicable_scenes = self.cleaner.split_scenes(row.applicable_scenes.as_deref());

        let latest_price_updated_at = match row.latest_price_updated_at.as_deref() {
            None => None,
            Some(raw) => Some(self.cleaner.parse_date(raw).ok_or_else(|| {
                ValidationError::new(
                    row.row_number,
                    ProductColumn::LatestPriceUpdatedAt.key(),
                    t_with_args("import.invalid_date", &[("value", raw)]),
                )
            })?),
        };

        Ok(ProductDraft {
            row_number: row.row_number,
            name,
            spec_weight,
            package_type,
            category,
            brand,
            status,
            price_trend,
            applicable_scenes,
            latest_price_updated_at,
            moq: self.cleaner.normalize_null(row.moq.as_deref()),
            supply_area: self.cleaner.normalize_null(row.supply_area.as_deref()),
            description: self.cleaner.normalize_null(row.description.as_deref()),
            latest_price_note: self.cleaner.normalize_null(row.latest_price_note.as_deref()),
        })
    }
}

impl Default for ProductValidator {
    fn default() -> Self {
        Self::new(Box::new(DataCleaner))
    }
}

impl ProductValidatorTrait for ProductValidator {
    fn validate_row(&self, row: &RawRow, catalog: &ReferenceCatalog) -> RowOutcome {
        self.check(row, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::PriceTrend;
    use chrono::NaiveDate;

    fn catalog() -> ReferenceCatalog {
        ReferenceCatalog::new(
            vec![
                Category {
                    id: 1,
                    name: "粮油".to_string(),
                },
                Category {
                    id: 2,
                    name: "饮料".to_string(),
                },
            ],
            vec![Brand {
                id: 1,
                name: "金龙鱼".to_string(),
            }],
        )
    }

    fn valid_row(row_number: usize) -> RawRow {
        RawRow {
            row_number,
            name: Some("大豆油".to_string()),
            category_id: Some("1".to_string()),
            spec_weight: Some("5L".to_string()),
            package_type: Some("桶装".to_string()),
            ..Default::default()
        }
    }

    fn error_of(outcome: RowOutcome) -> ValidationError {
        match outcome {
            Err(e) => e,
            Ok(draft) => panic!("expected error, got draft for row {}", draft.row_number),
        }
    }

    #[test]
    fn test_valid_row_defaults() {
        let draft = ProductValidator::default()
            .validate_row(&valid_row(2), &catalog())
            .unwrap();
        assert_eq!(draft.category.id, 1);
        assert_eq!(draft.brand, None);
        assert_eq!(draft.status, ProductStatus::Listed);
        assert_eq!(draft.price_trend, None);
        assert!(draft.applicable_scenes.is_empty());
    }

    #[test]
    fn test_missing_required_field_names_that_column() {
        let validator = ProductValidator::default();
        let catalog = catalog();

        // 其余列同样无效时，仍报告第一个必填列
        let mut row = valid_row(3);
        row.spec_weight = None;
        row.category_id = Some("999".to_string());
        row.status = Some("??".to_string());
        let err = error_of(validator.validate_row(&row, &catalog));
        assert_eq!(err.row, 3);
        assert_eq!(err.field, "spec_weight");

        let mut row = valid_row(4);
        row.package_type = None;
        assert_eq!(error_of(validator.validate_row(&row, &catalog)).field, "package_type");

        let mut row = valid_row(5);
        row.name = None;
        row.package_type = None;
        assert_eq!(error_of(validator.validate_row(&row, &catalog)).field, "name");
    }

    #[test]
    fn test_category_id_wins_over_valid_name() {
        let mut row = valid_row(2);
        row.category_id = Some("999".to_string());
        row.category_name = Some("粮油".to_string());

        let err = error_of(ProductValidator::default().validate_row(&row, &catalog()));
        assert_eq!(err.field, "category_id");
        assert!(err.message.contains("999"));
    }

    #[test]
    fn test_category_by_name_and_missing_category() {
        let validator = ProductValidator::default();
        let catalog = catalog();

        let mut row = valid_row(2);
        row.category_id = None;
        row.category_name = Some("饮料".to_string());
        assert_eq!(validator.validate_row(&row, &catalog).unwrap().category.id, 2);

        row.category_name = Some("家电".to_string());
        let err = error_of(validator.validate_row(&row, &catalog));
        assert_eq!(err.field, "category_name");
        assert!(err.message.contains("家电"));

        row.category_name = None;
        assert_eq!(error_of(validator.validate_row(&row, &catalog)).field, "category_id");
    }

    #[test]
    fn test_brand_resolution() {
        let validator = ProductValidator::default();
        let catalog = catalog();

        let mut row = valid_row(2);
        row.brand_name = Some("金龙鱼".to_string());
        assert_eq!(validator.validate_row(&row, &catalog).unwrap().brand.map(|b| b.id), Some(1));

        row.brand_id = Some("7".to_string());
        let err = error_of(validator.validate_row(&row, &catalog));
        assert_eq!(err.field, "brand_id");
        assert!(err.message.contains('7'));

        row.brand_id = None;
        row.brand_name = Some("鲁花".to_string());
        assert_eq!(error_of(validator.validate_row(&row, &catalog)).field, "brand_name");
    }

    #[test]
    fn test_status_synonyms_share_canonical_value() {
        let validator = ProductValidator::default();
        let catalog = catalog();

        let mut a = valid_row(2);
        a.status = Some("上架".to_string());
        let mut b = valid_row(3);
        b.status = Some("1".to_string());

        let a = validator.validate_row(&a, &catalog).unwrap();
        let b = validator.validate_row(&b, &catalog).unwrap();
        assert_eq!(a.status, b.status);
        assert_eq!(a.status.as_str(), "listed");
    }

    #[test]
    fn test_invalid_enum_quotes_literal() {
        let validator = ProductValidator::default();
        let catalog = catalog();

        let mut row = valid_row(2);
        row.status = Some("在售".to_string());
        let err = error_of(validator.validate_row(&row, &catalog));
        assert_eq!(err.field, "status");
        assert!(err.message.contains("\"在售\""));

        let mut row = valid_row(2);
        row.price_trend = Some("暴涨".to_string());
        let err = error_of(validator.validate_row(&row, &catalog));
        assert_eq!(err.field, "price_trend");
        assert!(err.message.contains("\"暴涨\""));
    }

    #[test]
    fn test_optional_fields_are_normalized() {
        let mut row = valid_row(2);
        row.price_trend = Some("涨".to_string());
        row.applicable_scenes = Some("餐饮, 家庭,".to_string());
        row.latest_price_updated_at = Some("2025/03/09".to_string());
        row.moq = Some("10箱".to_string());

        let draft = ProductValidator::default()
            .validate_row(&row, &catalog())
            .unwrap();
        assert_eq!(draft.price_trend, Some(PriceTrend::Up));
        assert_eq!(draft.applicable_scenes, vec!["餐饮", "家庭"]);
        assert_eq!(draft.latest_price_updated_at, NaiveDate::from_ymd_opt(2025, 3, 9));
        assert_eq!(draft.moq.as_deref(), Some("10箱"));
    }

    #[test]
    fn test_invalid_date() {
        let mut row = valid_row(2);
        row.latest_price_updated_at = Some("下周一".to_string());
        let err = error_of(ProductValidator::default().validate_row(&row, &catalog()));
        assert_eq!(err.field, "latest_price_updated_at");
        assert!(err.message.contains("下周一"));
    }
}
