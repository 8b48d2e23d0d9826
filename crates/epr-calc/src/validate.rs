//! 資料列驗證
//!
//! 問題附在出錯的資料列上；阻擋性問題只擋該列的保存。

use epr_core::{
    Category, ComponentRow, MonthlyProcurementRow, ProductRow, RecycledUsageRow, Row, RowIssue,
    RowIssues, SupplierRow, ThicknessPolicy,
};

use crate::compliance::assess_thickness;

/// 必填欄位檢查
pub trait RequiredFields {
    /// 缺漏的欄位（JSON 欄位名稱）
    fn missing_fields(&self) -> Vec<&'static str>;
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn collect_missing(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(field, _)| *field)
        .collect()
}

impl RequiredFields for ProductRow {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("systemCode", blank(&self.system_code)),
            ("skuCode", blank(&self.sku_code)),
            ("skuDescription", blank(&self.sku_description)),
            ("componentDescription", blank(&self.component_description)),
            ("componentCode", blank(&self.component_code)),
            ("supplierName", blank(&self.supplier_name)),
        ])
    }
}

impl RequiredFields for SupplierRow {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("systemCode", blank(&self.system_code)),
            ("componentCode", blank(&self.component_code)),
            ("supplierName", blank(&self.supplier_name)),
            ("supplierStatus", self.supplier_status.is_none()),
            (
                "eprCertificateNumber",
                self.epr_certificate_enabled() && blank(&self.epr_certificate_number),
            ),
            ("fssaiLicNo", self.fssai_enabled() && blank(&self.fssai_lic_no)),
        ])
    }
}

impl RequiredFields for ComponentRow {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("systemCode", blank(&self.system_code)),
            ("componentCode", blank(&self.component_code)),
            ("componentDescription", blank(&self.component_description)),
            ("polymerType", blank(&self.polymer_type)),
            ("componentPolymer", blank(&self.component_polymer)),
            ("category", self.category.is_none()),
            (
                "categoryIIType",
                self.category == Some(Category::CategoryII) && blank(&self.category_ii_type),
            ),
        ])
    }
}

impl RequiredFields for MonthlyProcurementRow {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("systemCode", blank(&self.system_code)),
            ("componentCode", blank(&self.component_code)),
            ("dateOfInvoice", blank(&self.date_of_invoice)),
            ("uom", self.uom.is_none()),
        ])
    }
}

impl RequiredFields for RecycledUsageRow {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect_missing(&[
            ("systemCode", blank(&self.system_code)),
            ("componentCode", blank(&self.component_code)),
            ("category", self.category.is_none()),
            ("uom", self.uom.is_none()),
        ])
    }
}

fn required<T: RequiredFields + Row>(row: &T) -> RowIssues {
    let mut issues = RowIssues::new(row.reference());
    let missing = row.missing_fields();
    if !missing.is_empty() {
        issues.push(RowIssue::missing(missing));
    }
    issues
}

fn natural_key(sku_code: &str, component_description: &str) -> String {
    format!("{} / {}", sku_code, component_description)
}

/// 驗證產品列（含與其他產品列的代碼一致性）
pub fn validate_product(row: &ProductRow, products: &[ProductRow]) -> RowIssues {
    let mut issues = required(row);
    let key = natural_key(&row.sku_code, &row.component_description);

    for other in products.iter().filter(|other| other.id != row.id) {
        let other_key = natural_key(&other.sku_code, &other.component_description);

        if !row.component_code.is_empty() && other.component_code == row.component_code {
            if other_key != key {
                issues.push(RowIssue::CodeCollision {
                    field: "componentCode".to_string(),
                    code: row.component_code.clone(),
                    existing_key: other_key.clone(),
                    conflicting_key: key.clone(),
                });
            }
        } else if other_key == key
            && !blank(&row.sku_code)
            && !other.component_code.is_empty()
            && !row.component_code.is_empty()
        {
            issues.push(RowIssue::consistency(
                "componentCode",
                format!(
                    "「{}」已使用 {}，此列為 {}",
                    key, other.component_code, row.component_code
                ),
            ));
        }

        if !row.supplier_code.is_empty() && other.supplier_code == row.supplier_code {
            if !other.same_supplier(&row.supplier_name) {
                issues.push(RowIssue::CodeCollision {
                    field: "supplierCode".to_string(),
                    code: row.supplier_code.clone(),
                    existing_key: other.supplier_name.clone(),
                    conflicting_key: row.supplier_name.clone(),
                });
            }
        } else if row.assigns_supplier_code()
            && other.assigns_supplier_code()
            && other.same_supplier(&row.supplier_name)
            && !other.supplier_code.is_empty()
            && !row.supplier_code.is_empty()
        {
            issues.push(RowIssue::consistency(
                "supplierCode",
                format!(
                    "{} 已使用 {}，此列為 {}",
                    row.supplier_name, other.supplier_code, row.supplier_code
                ),
            ));
        }
    }

    issues
}

/// 驗證供應商列
pub fn validate_supplier(row: &SupplierRow) -> RowIssues {
    required(row)
}

/// 驗證組件列（聚合物、樹脂辨識碼、代碼衝突、厚度）
pub fn validate_component(
    row: &ComponentRow,
    components: &[ComponentRow],
    policy: &ThicknessPolicy,
) -> RowIssues {
    let mut issues = required(row);

    if !row.polymer_matches() {
        issues.push(RowIssue::consistency(
            "componentPolymer",
            format!("聚合物類型 {} 與組件聚合物 {} 不符", row.polymer_type, row.component_polymer),
        ));
    }

    if let Some(code) = row.polymer_code {
        if !(1..=7).contains(&code) {
            issues.push(RowIssue::consistency(
                "polymerCode",
                format!("樹脂辨識碼必須介於 1 到 7: {}", code),
            ));
        }
    }

    let key = natural_key(&row.sku_code, &row.component_description);
    for other in components.iter().filter(|other| other.id != row.id) {
        if row.component_code.is_empty() || other.component_code != row.component_code {
            continue;
        }
        let other_key = natural_key(&other.sku_code, &other.component_description);
        if other_key != key {
            issues.push(RowIssue::CodeCollision {
                field: "componentCode".to_string(),
                code: row.component_code.clone(),
                existing_key: other_key,
                conflicting_key: key.clone(),
            });
        }
    }

    if let Some(warning) = assess_thickness(row, policy).to_issue() {
        issues.push(warning);
    }

    issues
}

/// 驗證每月採購列
pub fn validate_monthly(row: &MonthlyProcurementRow) -> RowIssues {
    required(row)
}

/// 驗證再生料使用列
pub fn validate_recycled_usage(row: &RecycledUsageRow) -> RowIssues {
    required(row)
}
