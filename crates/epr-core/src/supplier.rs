//! 供應商資料列

use serde::{Deserialize, Serialize};

use crate::product::YesNo;
use crate::row::{Collection, Row, RowId};
use crate::serde_util;

/// 供應商 EPR 登記狀態
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
pub enum SupplierStatus {
    Registered,
    Unregistered,
}

/// 供應商資料列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierRow {
    pub id: RowId,

    pub system_code: String,

    pub component_code: String,

    pub component_description: String,

    pub supplier_name: String,

    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub supplier_status: Option<SupplierStatus>,

    /// 是否為食品級
    #[serde(deserialize_with = "serde_util::blank_as_none")]
    pub food_grade: Option<YesNo>,

    /// EPR 證書號碼（僅已登記供應商）
    pub epr_certificate_number: String,

    /// FSSAI 執照號碼（僅食品級且已有組件代碼）
    pub fssai_lic_no: String,
}

impl SupplierRow {
    /// 創建空白供應商列
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置組件代碼
    pub fn with_component_code(mut self, code: &str) -> Self {
        self.component_code = code.to_string();
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_name: &str) -> Self {
        self.supplier_name = supplier_name.to_string();
        self
    }

    /// 建構器模式：設置登記狀態
    pub fn with_status(mut self, status: SupplierStatus) -> Self {
        self.supplier_status = Some(status);
        self
    }

    /// 建構器模式：設置食品級
    pub fn with_food_grade(mut self, food_grade: YesNo) -> Self {
        self.food_grade = Some(food_grade);
        self
    }

    pub fn is_registered(&self) -> bool {
        self.supplier_status == Some(SupplierStatus::Registered)
    }

    /// EPR 證書欄位是否可填
    pub fn epr_certificate_enabled(&self) -> bool {
        self.is_registered()
    }

    /// FSSAI 欄位是否可填
    pub fn fssai_enabled(&self) -> bool {
        self.food_grade == Some(YesNo::Yes) && !self.component_code.trim().is_empty()
    }

    /// 清除目前不可填的條件欄位，回傳是否有變動
    pub fn clear_disabled_fields(&mut self) -> bool {
        let mut changed = false;

        if !self.epr_certificate_enabled() && !self.epr_certificate_number.is_empty() {
            self.epr_certificate_number.clear();
            changed = true;
        }

        if !self.fssai_enabled() && !self.fssai_lic_no.is_empty() {
            self.fssai_lic_no.clear();
            changed = true;
        }

        changed
    }
}

impl Row for SupplierRow {
    const COLLECTION: Collection = Collection::Suppliers;

    fn id(&self) -> RowId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional_fields_enabled() {
        let row = SupplierRow::new()
            .with_component_code("ABC/PLAN/Com/001")
            .with_status(SupplierStatus::Registered)
            .with_food_grade(YesNo::Yes);

        assert!(row.epr_certificate_enabled());
        assert!(row.fssai_enabled());
    }

    #[test]
    fn test_fssai_requires_component_code() {
        let row = SupplierRow::new().with_food_grade(YesNo::Yes);
        assert!(!row.fssai_enabled());
    }

    #[test]
    fn test_clear_disabled_fields() {
        let mut row = SupplierRow::new()
            .with_status(SupplierStatus::Unregistered)
            .with_food_grade(YesNo::No);
        row.epr_certificate_number = "EPR-123".to_string();
        row.fssai_lic_no = "FSSAI-9".to_string();

        assert!(row.clear_disabled_fields());
        assert!(row.epr_certificate_number.is_empty());
        assert!(row.fssai_lic_no.is_empty());

        // 再清一次不會有變動
        assert!(!row.clear_disabled_fields());
    }

    #[test]
    fn test_status_parses_case_insensitive() {
        assert_eq!(
            "registered".parse::<SupplierStatus>().unwrap(),
            SupplierStatus::Registered
        );
        assert!("pending".parse::<SupplierStatus>().is_err());
    }
}
