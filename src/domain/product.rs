// ==========================================
// 贸易产品目录 - 产品领域模型
// ==========================================
// 职责: 分类/品牌参考数据、产品草稿、产品身份键
// 红线: 草稿创建后不可变（重新校验时整体替换）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 品牌未填写时身份键中的占位值
pub const NO_BRAND_KEY: &str = "none";

// ==========================================
// Category / Brand - 参考目录记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

// ==========================================
// RefSelector - 分类/品牌引用方式
// ==========================================
// id 优先于名称；两者都未填写为 Unspecified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSelector {
    ById(String),
    ByName(String),
    Unspecified,
}

impl RefSelector {
    pub fn from_cells(id: Option<&str>, name: Option<&str>) -> Self {
        match (id, name) {
            (Some(id), _) => RefSelector::ById(id.to_string()),
            (None, Some(name)) => RefSelector::ByName(name.to_string()),
            (None, None) => RefSelector::Unspecified,
        }
    }
}

// ==========================================
// ProductStatus - 上下架状态
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Listed,   // 上架
    Delisted, // 下架
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Listed => "listed",
            ProductStatus::Delisted => "delisted",
        }
    }
}

// ==========================================
// PriceTrend - 价格走势
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Up,
    Down,
    Flat,
}

impl PriceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::Up => "up",
            PriceTrend::Down => "down",
            PriceTrend::Flat => "flat",
        }
    }
}

// ==========================================
// ProductDraft - 校验通过的产品草稿
// ==========================================
// 用途: 校验器产出，去重器/批量提交器消费
// 生命周期: 仅在单次导入内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    // 元信息
    pub row_number: usize, // 原始文件行号（表头为第 1 行）

    // 必填字段
    pub name: String,
    pub spec_weight: String,
    pub package_type: String,

    // 已解析的引用
    pub category: Category,
    pub brand: Option<Brand>,

    // 规范化字段
    pub status: ProductStatus,
    pub price_trend: Option<PriceTrend>,
    pub applicable_scenes: Vec<String>,
    pub latest_price_updated_at: Option<NaiveDate>,

    // 可选字段
    pub moq: Option<String>,
    pub supply_area: Option<String>,
    pub description: Option<String>,
    pub latest_price_note: Option<String>,
}

impl ProductDraft {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(
            &self.name,
            &self.spec_weight,
            self.category.id,
            self.brand.as_ref().map(|b| b.id),
        )
    }
}

// ==========================================
// IdentityKey - 产品身份键
// ==========================================
// (名称, 规格重量, 分类ID, 品牌ID|"none")，四项完全相同才相等
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub name: String,
    pub spec_weight: String,
    pub category_id: i64,
    pub brand_id: Option<i64>,
}

impl IdentityKey {
    pub fn new(name: &str, spec_weight: &str, category_id: i64, brand_id: Option<i64>) -> Self {
        Self {
            name: name.to_string(),
            spec_weight: spec_weight.to_string(),
            category_id,
            brand_id,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.brand_id {
            Some(brand_id) => write!(
                f,
                "{}|{}|{}|{}",
                self.name, self.spec_weight, self.category_id, brand_id
            ),
            None => write!(
                f,
                "{}|{}|{}|{}",
                self.name, self.spec_weight, self.category_id, NO_BRAND_KEY
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_selector_prefers_id() {
        assert_eq!(
            RefSelector::from_cells(Some("3"), Some("粮油")),
            RefSelector::ById("3".to_string())
        );
        assert_eq!(
            RefSelector::from_cells(None, Some("粮油")),
            RefSelector::ByName("粮油".to_string())
        );
        assert_eq!(RefSelector::from_cells(None, None), RefSelector::Unspecified);
    }

    #[test]
    fn test_identity_key_display_uses_none_for_missing_brand() {
        let key = IdentityKey::new("大豆油", "5L", 1, None);
        assert_eq!(key.to_string(), "大豆油|5L|1|none");

        let key = IdentityKey::new("大豆油", "5L", 1, Some(2));
        assert_eq!(key.to_string(), "大豆油|5L|1|2");
    }

    #[test]
    fn test_identity_key_equality_requires_all_parts() {
        let a = IdentityKey::new("大豆油", "5L", 1, None);
        assert_eq!(a, IdentityKey::new("大豆油", "5L", 1, None));
        assert_ne!(a, IdentityKey::new("大豆油", "5L", 1, Some(1)));
        assert_ne!(a, IdentityKey::new("大豆油", "1L", 1, None));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProductStatus::Delisted).unwrap();
        assert_eq!(json, "\"delisted\"");
        assert_eq!(PriceTrend::Flat.as_str(), "flat");
    }

    #[test]
    fn test_default_status_is_listed() {
        assert_eq!(ProductStatus::default(), ProductStatus::Listed);
        assert_eq!(ProductStatus::default().as_str(), "listed");
    }
}
