// ==========================================
// 贸易产品目录 - 参考目录快照
// ==========================================
// 职责: 导入开始前一次性加载分类/品牌，构建 id/名称 索引
// 红线: 快照只读；导入过程中的目录变化不反映到本次导入
// ==========================================

use crate::domain::product::{Brand, Category, RefSelector};
use crate::importer::error::{ImportError, PipelineResult};
use crate::repository::catalog_repo::CatalogRepository;
use std::collections::HashMap;
use tracing::debug;

/// 引用解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefResolution<'a, T> {
    Found(&'a T),
    UnknownId(String),
    UnknownName(String),
    Unspecified,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    categories_by_id: HashMap<i64, Category>,
    categories_by_name: HashMap<String, Category>,
    brands_by_id: HashMap<i64, Brand>,
    brands_by_name: HashMap<String, Brand>,
}

impl ReferenceCatalog {
    pub fn new(categories: Vec<Category>, brands: Vec<Brand>) -> Self {
        let mut catalog = Self::default();
        for category in categories {
            catalog
                .categories_by_name
                .insert(category.name.trim().to_string(), category.clone());
            catalog.categories_by_id.insert(category.id, category);
        }
        for brand in brands {
            catalog
                .brands_by_name
                .insert(brand.name.trim().to_string(), brand.clone());
            catalog.brands_by_id.insert(brand.id, brand);
        }
        catalog
    }

    /// 从仓储加载快照；读取失败为致命错误
    pub async fn load<R>(repo: &R) -> PipelineResult<Self>
    where
        R: CatalogRepository + ?Sized,
    {
        let categories = repo
            .list_categories()
            .await
            .map_err(|e| ImportError::CatalogUnavailable(e.to_string()))?;
        let brands = repo
            .list_brands()
            .await
            .map_err(|e| ImportError::CatalogUnavailable(e.to_string()))?;

        debug!(
            categories = categories.len(),
            brands = brands.len(),
            "参考目录快照已加载"
        );
        Ok(Self::new(categories, brands))
    }

    pub fn category_count(&self) -> usize {
        self.categories_by_id.len()
    }

    pub fn brand_count(&self) -> usize {
        self.brands_by_id.len()
    }

    pub fn resolve_category(&self, selector: &RefSelector) -> RefResolution<'_, Category> {
        resolve(selector, &self.categories_by_id, &self.categories_by_name)
    }

    pub fn resolve_brand(&self, selector: &RefSelector) -> RefResolution<'_, Brand> {
        resolve(selector, &self.brands_by_id, &self.brands_by_name)
    }
}

/// 解析单元格中的 id（"3" 或 Excel 数值 "3.0"）
pub fn parse_ref_id(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn resolve<'a, T>(
    selector: &RefSelector,
    by_id: &'a HashMap<i64, T>,
    by_name: &'a HashMap<String, T>,
) -> RefResolution<'a, T> {
    match selector {
        RefSelector::ById(raw) => match parse_ref_id(raw).and_then(|id| by_id.get(&id)) {
            Some(found) => RefResolution::Found(found),
            None => RefResolution::UnknownId(raw.clone()),
        },
        RefSelector::ByName(name) => match by_name.get(name.trim()) {
            Some(found) => RefResolution::Found(found),
            None => RefResolution::UnknownName(name.clone()),
        },
        RefSelector::Unspecified => RefResolution::Unspecified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;

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

    #[test]
    fn test_resolve_by_id_and_name() {
        let catalog = catalog();
        assert!(matches!(
            catalog.resolve_category(&RefSelector::ById("2".to_string())),
            RefResolution::Found(Category { id: 2, .. })
        ));
        assert!(matches!(
            catalog.resolve_category(&RefSelector::ByName("粮油".to_string())),
            RefResolution::Found(Category { id: 1, .. })
        ));
        assert_eq!(
            catalog.resolve_brand(&RefSelector::ByName("鲁花".to_string())),
            RefResolution::UnknownName("鲁花".to_string())
        );
    }

    #[test]
    fn test_non_numeric_id_is_unknown() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve_category(&RefSelector::ById("abc".to_string())),
            RefResolution::UnknownId("abc".to_string())
        );
        assert_eq!(
            catalog.resolve_category(&RefSelector::ById("999".to_string())),
            RefResolution::UnknownId("999".to_string())
        );
    }

    #[test]
    fn test_parse_ref_id() {
        assert_eq!(parse_ref_id("3"), Some(3));
        assert_eq!(parse_ref_id("3.0"), Some(3));
        assert_eq!(parse_ref_id("3.5"), None);
        assert_eq!(parse_ref_id("x"), None);
    }

    struct BrokenCatalogRepo;

    #[async_trait]
    impl CatalogRepository for BrokenCatalogRepo {
        async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
            Err(RepositoryError::DatabaseConnectionError("offline".to_string()))
        }

        async fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_load_failure_is_catalog_unavailable() {
        let result = ReferenceCatalog::load(&BrokenCatalogRepo).await;
        assert!(matches!(result, Err(ImportError::CatalogUnavailable(_))));
    }
}
