// ==========================================
// 贸易产品目录 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 枚举同义词 / 场景拆分 / 日期解析
// 红线: 不产生错误消息，失败由校验器转换为行级错误
// ==========================================

use crate::domain::product::{PriceTrend, ProductStatus};
use crate::importer::product_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{NaiveDate, NaiveDateTime};

/// 适用场景分隔符
pub const SCENE_DELIMITER: char = ',';

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

// 完整日期时间，只取日期部分
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_status(&self, value: &str) -> Option<ProductStatus> {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "上架" | "1" | "true" | "listed" | "on" | "yes" | "是" => Some(ProductStatus::Listed),
            "下架" | "0" | "false" | "delisted" | "off" | "no" | "否" => {
                Some(ProductStatus::Delisted)
            }
            _ => None,
        }
    }

    fn parse_price_trend(&self, value: &str) -> Option<PriceTrend> {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "上涨" | "涨" | "up" | "rise" | "↑" => Some(PriceTrend::Up),
            "下跌" | "跌" | "down" | "fall" | "↓" => Some(PriceTrend::Down),
            "持平" | "平" | "flat" | "stable" | "-" => Some(PriceTrend::Flat),
            _ => None,
        }
    }

    fn split_scenes(&self, value: Option<&str>) -> Vec<String> {
        value
            .map(|v| {
                v.split(SCENE_DELIMITER)
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                    .map(|dt| dt.date())
            })
    }
}
