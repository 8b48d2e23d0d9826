//! 每月採購資料列

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::InvoicePeriod;
use crate::component::Category;
use crate::product::YesNo;
use crate::row::{Collection, Row, RowId};
use crate::serde_util;
use crate::units::Uom;

/// 每月採購資料列
///
/// 標記「衍生」的欄位由計算器重算，使用者輸入會被覆蓋。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyProcurementRow {
    pub id: RowId,

    pub system_code: String,

    pub supplier_name: String,

    pub component_code: String,

    pub component_description: String,

    pub polymer_type: String,

    pub component_polymer: String,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub category: Option<Category>,

    /// 發票日期（dd-mm-yyyy 或 `Not Applicable`）
    pub date_of_invoice: String,

    /// 衍生：月份名稱
    pub month_name: String,

    /// 衍生：會計季度
    pub quarter: String,

    /// 衍生：會計半年度
    pub half_year: String,

    #[serde(deserialize_with = "serde_util::decimal")]
    pub purchase_qty: Decimal,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub uom: Option<Uom>,

    /// 單件重量（公斤）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub per_piece_weight_kg: Decimal,

    /// 衍生：當月採購量（公噸）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub monthly_purchase_mt: Decimal,

    /// 再生料比例（分數；輸入大於 1 視為百分比）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub recycled_percent: Decimal,

    /// 衍生：再生料數量（公噸）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub recycled_qty: Decimal,

    /// 再生料單價（每公斤）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub recycled_rate: Decimal,

    /// 衍生：再生料金額
    #[serde(deserialize_with = "serde_util::decimal")]
    pub recycled_qrt_amount: Decimal,

    /// 原生料單價（每公斤）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub virgin_rate: Decimal,

    /// 衍生：原生料數量（公噸）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub virgin_qty: Decimal,

    /// 衍生：原生料金額
    #[serde(deserialize_with = "serde_util::decimal")]
    pub virgin_qty_amount: Decimal,

    /// 發票上是否載明再生料比例
    #[serde(rename = "rcPercentMentioned", deserialize_with = "serde_util::blank_as_none")]
    pub rc_percent_mentioned: Option<YesNo>,
}

impl MonthlyProcurementRow {
    /// 創建空白採購列
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置組件
    pub fn with_component(mut self, code: &str, description: &str) -> Self {
        self.component_code = code.to_string();
        self.component_description = description.to_string();
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_name: &str) -> Self {
        self.supplier_name = supplier_name.to_string();
        self
    }

    /// 建構器模式：設置發票日期
    pub fn with_invoice_date(mut self, date: &str) -> Self {
        self.date_of_invoice = date.to_string();
        self
    }

    /// 建構器模式：設置採購數量
    pub fn with_purchase(mut self, qty: Decimal, uom: Uom, per_piece_weight_kg: Decimal) -> Self {
        self.purchase_qty = qty;
        self.uom = Some(uom);
        self.per_piece_weight_kg = per_piece_weight_kg;
        self
    }

    /// 建構器模式：設置再生料比例
    pub fn with_recycled_percent(mut self, percent: Decimal) -> Self {
        self.recycled_percent = percent;
        self
    }

    /// 建構器模式：設置單價
    pub fn with_rates(mut self, recycled_rate: Decimal, virgin_rate: Decimal) -> Self {
        self.recycled_rate = recycled_rate;
        self.virgin_rate = virgin_rate;
        self
    }

    /// 目前的期間欄位
    pub fn period(&self) -> InvoicePeriod {
        InvoicePeriod {
            month_name: self.month_name.clone(),
            quarter: self.quarter.clone(),
            half_year: self.half_year.clone(),
        }
    }

    /// 寫入期間欄位
    pub fn set_period(&mut self, period: InvoicePeriod) {
        self.month_name = period.month_name;
        self.quarter = period.quarter;
        self.half_year = period.half_year;
    }
}

impl Row for MonthlyProcurementRow {
    const COLLECTION: Collection = Collection::MonthlyProcurement;

    fn id(&self) -> RowId {
        self.id
    }
}
