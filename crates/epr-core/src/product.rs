//! 產品（SKU × 包材組件）資料列

use serde::{Deserialize, Serialize};

use crate::row::{Collection, Row, RowId};
use crate::serde_util;

/// 是／否旗標
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum YesNo {
    Yes,
    No,
}

/// 產品資料列（組件代碼、供應商代碼的權威來源）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductRow {
    pub id: RowId,

    /// 包裝型態
    pub packaging_type: String,

    pub sku_code: String,

    pub sku_description: String,

    pub sku_uom: String,

    /// 產品圖片（外部儲存的參照）
    pub product_image: Option<String>,

    /// 組件代碼模式：`No` 由引擎指派，`Yes` 清空等待切回
    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub generate: Option<YesNo>,

    pub component_code: String,

    /// 系統代碼（跨表參照鍵）
    pub system_code: String,

    pub component_description: String,

    pub supplier_name: String,

    pub supplier_type: String,

    pub supplier_category: String,

    /// 供應商代碼模式：`No` 由引擎指派，`Yes` 清空等待切回
    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub generate_supplier_code: Option<YesNo>,

    pub supplier_code: String,

    /// 組件圖片（外部儲存的參照）
    pub component_image: Option<String>,
}

impl ProductRow {
    /// 創建空白產品列
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置 SKU
    pub fn with_sku(mut self, sku_code: &str, sku_description: &str) -> Self {
        self.sku_code = sku_code.to_string();
        self.sku_description = sku_description.to_string();
        self
    }

    /// 建構器模式：設置組件描述
    pub fn with_component_description(mut self, description: &str) -> Self {
        self.component_description = description.to_string();
        self
    }

    /// 建構器模式：設置組件代碼
    pub fn with_component_code(mut self, code: &str) -> Self {
        self.component_code = code.to_string();
        self
    }

    /// 建構器模式：設置系統代碼
    pub fn with_system_code(mut self, code: &str) -> Self {
        self.system_code = code.to_string();
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_name: &str) -> Self {
        self.supplier_name = supplier_name.to_string();
        self
    }

    /// 建構器模式：設置供應商代碼
    pub fn with_supplier_code(mut self, code: &str) -> Self {
        self.supplier_code = code.to_string();
        self
    }

    /// 建構器模式：設置組件代碼模式
    pub fn with_generate(mut self, generate: YesNo) -> Self {
        self.generate = Some(generate);
        self
    }

    /// 建構器模式：設置供應商代碼模式
    pub fn with_generate_supplier_code(mut self, generate: YesNo) -> Self {
        self.generate_supplier_code = Some(generate);
        self
    }

    /// 組件代碼是否由引擎指派
    pub fn assigns_component_code(&self) -> bool {
        self.generate == Some(YesNo::No)
    }

    /// 供應商代碼是否由引擎指派
    pub fn assigns_supplier_code(&self) -> bool {
        self.generate_supplier_code == Some(YesNo::No)
    }

    /// 組件自然鍵 `(skuCode, componentDescription)` 是否相同
    pub fn same_component_key(&self, sku_code: &str, component_description: &str) -> bool {
        self.sku_code == sku_code && self.component_description == component_description
    }

    /// 供應商名稱是否相同（不分大小寫）
    pub fn same_supplier(&self, supplier_name: &str) -> bool {
        !supplier_name.trim().is_empty()
            && self.supplier_name.trim().to_lowercase() == supplier_name.trim().to_lowercase()
    }
}

impl Row for ProductRow {
    const COLLECTION: Collection = Collection::Products;

    fn id(&self) -> RowId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_product_row() {
        let row = ProductRow::new()
            .with_sku("SKU-1", "Shampoo 200ml")
            .with_component_description("Cap")
            .with_supplier("Acme Plastics")
            .with_generate(YesNo::No);

        assert_eq!(row.sku_code, "SKU-1");
        assert!(row.assigns_component_code());
        assert!(!row.assigns_supplier_code());
        assert!(row.same_component_key("SKU-1", "Cap"));
        assert!(!row.same_component_key("SKU-1", "Label"));
    }

    #[test]
    fn test_supplier_match_ignores_case() {
        let row = ProductRow::new().with_supplier("Acme Plastics");
        assert!(row.same_supplier("ACME plastics"));
        assert!(row.same_supplier(" acme plastics "));
        assert!(!row.same_supplier(""));
    }

    #[test]
    fn test_product_row_from_camel_case_json() {
        let row: ProductRow = serde_json::from_value(json!({
            "skuCode": "SKU-9",
            "componentDescription": "Label",
            "generate": "No",
            "generateSupplierCode": ""
        }))
        .unwrap();

        assert_eq!(row.sku_code, "SKU-9");
        assert_eq!(row.generate, Some(YesNo::No));
        assert_eq!(row.generate_supplier_code, None);
        assert!(row.component_code.is_empty());
    }
}
