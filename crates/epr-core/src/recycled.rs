//! 再生料使用資料列

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::component::Category;
use crate::row::{Collection, Row, RowId};
use crate::serde_util;
use crate::units::Uom;

/// 再生料使用資料列（年度）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecycledUsageRow {
    pub id: RowId,

    pub system_code: String,

    pub component_code: String,

    pub component_description: String,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub category: Option<Category>,

    pub supplier_name: String,

    /// 年度消耗量
    #[serde(deserialize_with = "serde_util::decimal")]
    pub annual_consumption: Decimal,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub uom: Option<Uom>,

    /// 單件重量（公斤）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub per_piece_weight: Decimal,

    /// 衍生：年度消耗量（公噸）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub annual_consumption_mt: Decimal,

    /// 使用的再生料比例（分數）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub used_recycled_percent: Decimal,

    /// 衍生：使用的再生料數量（公噸）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub used_recycled_qty_mt: Decimal,
}

impl RecycledUsageRow {
    /// 創建空白再生料使用列
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置組件
    pub fn with_component(mut self, code: &str, description: &str) -> Self {
        self.component_code = code.to_string();
        self.component_description = description.to_string();
        self
    }

    /// 建構器模式：設置類別
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// 建構器模式：設置年度消耗量
    pub fn with_consumption(mut self, qty: Decimal, uom: Uom, per_piece_weight: Decimal) -> Self {
        self.annual_consumption = qty;
        self.uom = Some(uom);
        self.per_piece_weight = per_piece_weight;
        self
    }

    /// 建構器模式：設置再生料比例
    pub fn with_used_recycled_percent(mut self, percent: Decimal) -> Self {
        self.used_recycled_percent = percent;
        self
    }

    /// 彙總用的類別標籤（未填寫歸入 `Unspecified`）
    pub fn category_label(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.as_ref())
            .unwrap_or(crate::summary::UNSPECIFIED_CATEGORY)
    }
}

impl Row for RecycledUsageRow {
    const COLLECTION: Collection = Collection::RecycledUsage;

    fn id(&self) -> RowId {
        self.id
    }
}
