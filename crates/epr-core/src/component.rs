//! 包材組件資料列

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::row::{Collection, Row, RowId};
use crate::serde_util;

/// 塑膠包材法規類別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    /// 硬質包材
    #[serde(rename = "Category I")]
    #[strum(serialize = "Category I")]
    CategoryI,
    /// 軟質單層／多層包材
    #[serde(rename = "Category II")]
    #[strum(serialize = "Category II")]
    CategoryII,
    /// 多層複合包材
    #[serde(rename = "Category III")]
    #[strum(serialize = "Category III")]
    CategoryIII,
    /// 可堆肥包材
    #[serde(rename = "Category IV")]
    #[strum(serialize = "Category IV")]
    CategoryIV,
    #[serde(rename = "Not Applicable")]
    #[strum(serialize = "Not Applicable")]
    NotApplicable,
}

/// 聚合物類型為此值時不檢查與組件聚合物是否一致
pub const POLYMER_TYPE_OTHERS: &str = "Others";

/// 包材組件資料列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentRow {
    pub id: RowId,

    pub system_code: String,

    pub sku_code: String,

    pub component_code: String,

    pub component_description: String,

    pub supplier_name: String,

    /// 聚合物類型（下拉選單）
    pub polymer_type: String,

    /// 組件實際聚合物
    pub component_polymer: String,

    /// 樹脂辨識碼 1–7
    #[serde(deserialize_with = "serde_util::optional_u8")]
    pub polymer_code: Option<u8>,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub category: Option<Category>,

    /// 第二類包材細分（僅 Category II）
    #[serde(rename = "categoryIIType")]
    pub category_ii_type: String,

    /// 容器容量（僅 Category I）
    pub container_capacity: String,

    pub layer_type: String,

    /// 厚度（微米）
    #[serde(deserialize_with = "serde_util::decimal")]
    pub thickness: Decimal,
}

impl ComponentRow {
    /// 創建空白組件列
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置組件代碼與描述
    pub fn with_component(mut self, code: &str, description: &str) -> Self {
        self.component_code = code.to_string();
        self.component_description = description.to_string();
        self
    }

    /// 建構器模式：設置系統代碼
    pub fn with_system_code(mut self, code: &str) -> Self {
        self.system_code = code.to_string();
        self
    }

    /// 建構器模式：設置 SKU
    pub fn with_sku_code(mut self, sku_code: &str) -> Self {
        self.sku_code = sku_code.to_string();
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_name: &str) -> Self {
        self.supplier_name = supplier_name.to_string();
        self
    }

    /// 建構器模式：設置聚合物
    pub fn with_polymer(mut self, polymer_type: &str, component_polymer: &str) -> Self {
        self.polymer_type = polymer_type.to_string();
        self.component_polymer = component_polymer.to_string();
        self
    }

    /// 建構器模式：設置類別
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// 建構器模式：設置第二類細分
    pub fn with_category_ii_type(mut self, kind: &str) -> Self {
        self.category_ii_type = kind.to_string();
        self
    }

    /// 建構器模式：設置厚度
    pub fn with_thickness(mut self, micron: Decimal) -> Self {
        self.thickness = micron;
        self
    }

    /// 變更類別並清除不再適用的條件欄位
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.clear_conditional_fields();
    }

    /// 清除與目前類別不符的條件欄位，回傳是否有變動
    pub fn clear_conditional_fields(&mut self) -> bool {
        let mut changed = false;

        if self.category != Some(Category::CategoryII) && !self.category_ii_type.is_empty() {
            self.category_ii_type.clear();
            changed = true;
        }

        if self.category != Some(Category::CategoryI) && !self.container_capacity.is_empty() {
            self.container_capacity.clear();
            changed = true;
        }

        changed
    }

    /// 聚合物類型與組件聚合物是否一致
    ///
    /// 類型為 `Others` 或任一方未填時視為一致（缺漏由必填檢查負責）。
    pub fn polymer_matches(&self) -> bool {
        let polymer_type = self.polymer_type.trim();
        let component_polymer = self.component_polymer.trim();

        if polymer_type.is_empty()
            || component_polymer.is_empty()
            || polymer_type.eq_ignore_ascii_case(POLYMER_TYPE_OTHERS)
        {
            return true;
        }

        polymer_type.to_lowercase() == component_polymer.to_lowercase()
    }
}

impl Row for ComponentRow {
    const COLLECTION: Collection = Collection::Components;

    fn id(&self) -> RowId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::CategoryII.to_string(), "Category II");
        assert_eq!(
            "category i".parse::<Category>().unwrap(),
            Category::CategoryI
        );
        assert_eq!(
            serde_json::to_value(Category::NotApplicable).unwrap(),
            json!("Not Applicable")
        );
        assert!("Category V".parse::<Category>().is_err());
    }

    #[test]
    fn test_leaving_category_ii_clears_type() {
        let mut row = ComponentRow::new()
            .with_category(Category::CategoryII)
            .with_category_ii_type("Carry Bags");

        row.set_category(Some(Category::CategoryIII));
        assert!(row.category_ii_type.is_empty());
    }

    #[test]
    fn test_leaving_category_i_clears_capacity() {
        let mut row = ComponentRow::new().with_category(Category::CategoryI);
        row.container_capacity = "1 L".to_string();

        row.set_category(Some(Category::CategoryI));
        assert_eq!(row.container_capacity, "1 L");

        row.set_category(None);
        assert!(row.container_capacity.is_empty());
    }

    #[test]
    fn test_polymer_matching() {
        assert!(ComponentRow::new().with_polymer("PP", "pp").polymer_matches());
        assert!(ComponentRow::new().with_polymer("Others", "EVOH").polymer_matches());
        assert!(!ComponentRow::new().with_polymer("HDPE", "PET").polymer_matches());
        assert!(ComponentRow::new().with_polymer("", "PET").polymer_matches());
    }

    #[test]
    fn test_component_row_from_json() {
        let row: ComponentRow = serde_json::from_value(json!({
            "componentCode": "ABC/PLAN/Com/001",
            "category": "Category II",
            "categoryIIType": "Carry Bags",
            "thickness": "130",
            "polymerCode": 4
        }))
        .unwrap();

        assert_eq!(row.category, Some(Category::CategoryII));
        assert_eq!(row.category_ii_type, "Carry Bags");
        assert_eq!(row.thickness, dec!(130));
        assert_eq!(row.polymer_code, Some(4));
    }
}
