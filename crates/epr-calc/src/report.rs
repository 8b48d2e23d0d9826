//! 合規報告

use std::collections::BTreeMap;

use epr_core::{CategorySummaryRow, MonthlyProcurementRow, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::compliance::{assess_thickness, ThicknessVerdict};
use crate::workbook::Workbook;

/// 採購合計
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementTotals {
    pub rows: usize,
    pub purchase_mt: Decimal,
    pub recycled_mt: Decimal,
    pub virgin_mt: Decimal,
    pub recycled_amount: Decimal,
    pub virgin_amount: Decimal,
}

impl ProcurementTotals {
    fn add(&mut self, row: &MonthlyProcurementRow) {
        self.rows += 1;
        self.purchase_mt += row.monthly_purchase_mt;
        self.recycled_mt += row.recycled_qty;
        self.virgin_mt += row.virgin_qty;
        self.recycled_amount += row.recycled_qrt_amount;
        self.virgin_amount += row.virgin_qty_amount;
    }
}

/// 未通過檢查的組件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFinding {
    pub component_code: String,
    pub component_description: String,
    pub thickness: ThicknessVerdict,
    pub polymer_mismatch: bool,
}

/// 工廠的合規報告
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub client_name: String,
    pub plant_name: String,
    /// 類別彙總與目標比較
    pub categories: Vec<CategorySummaryRow>,
    /// 全年採購合計
    pub procurement: ProcurementTotals,
    /// 依會計季度的採購合計（發票日期不適用或空白的列不列入）
    pub procurement_by_quarter: BTreeMap<String, ProcurementTotals>,
    pub component_findings: Vec<ComponentFinding>,
}

impl ComplianceReport {
    /// 由工作簿產生報告
    pub fn build(workbook: &Workbook) -> Self {
        let mut procurement = ProcurementTotals::default();
        let mut procurement_by_quarter: BTreeMap<String, ProcurementTotals> = BTreeMap::new();

        for row in &workbook.monthly_procurement {
            procurement.add(row);
            if row.quarter.starts_with('Q') {
                procurement_by_quarter
                    .entry(row.quarter.clone())
                    .or_default()
                    .add(row);
            }
        }

        let component_findings: Vec<ComponentFinding> = workbook
            .components
            .iter()
            .filter_map(|row| {
                let thickness = assess_thickness(row, &workbook.config.thickness_policy);
                let polymer_mismatch = !row.polymer_matches();
                let failed = matches!(thickness, ThicknessVerdict::BelowMinimum { .. });

                (failed || polymer_mismatch).then(|| ComponentFinding {
                    component_code: row.component_code.clone(),
                    component_description: row.component_description.clone(),
                    thickness,
                    polymer_mismatch,
                })
            })
            .collect();

        let report = Self {
            client_name: workbook.config.client_name.clone(),
            plant_name: workbook.config.plant_name.clone(),
            categories: workbook.category_summary.clone(),
            procurement,
            procurement_by_quarter,
            component_findings,
        };

        tracing::info!(
            "合規報告: {} 個類別（{} 個低於目標）, {} 個組件未通過檢查",
            report.categories.len(),
            report.categories_below_target(),
            report.component_findings.len()
        );

        report
    }

    /// 低於目標的類別數
    pub fn categories_below_target(&self) -> usize {
        self.categories
            .iter()
            .filter(|category| category.status.is_below_target())
            .count()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::DerivedFieldCalculator;
    use epr_core::{Category, ComponentRow, EngineConfig, RecycledUsageRow, Uom};
    use rust_decimal_macros::dec;

    fn monthly(date: &str, qty: Decimal) -> MonthlyProcurementRow {
        DerivedFieldCalculator::recompute_monthly_row(
            MonthlyProcurementRow::new()
                .with_invoice_date(date)
                .with_purchase(qty, Uom::Mt, Decimal::ZERO)
                .with_recycled_percent(dec!(0.25))
                .with_rates(dec!(10), dec!(20)),
        )
    }

    #[test]
    fn test_build_report() {
        let workbook = Workbook::new(EngineConfig::new("ABC Foods", "PLANT-1"))
            .with_monthly_procurement(vec![
                monthly("15-05-2024", dec!(2)),
                monthly("15-06-2024", dec!(2)),
                monthly("Not Applicable", dec!(4)),
            ])
            .with_components(vec![
                ComponentRow::new()
                    .with_component("ABC/PLAN/Com/001", "Bag")
                    .with_category(Category::CategoryII)
                    .with_category_ii_type("Carry Bags")
                    .with_thickness(dec!(100)),
                ComponentRow::new()
                    .with_component("ABC/PLAN/Com/002", "Bottle")
                    .with_polymer("HDPE", "HDPE")
                    .with_category(Category::CategoryI)
                    .with_thickness(dec!(300)),
            ])
            .with_recycled_usage(vec![RecycledUsageRow::new()
                .with_category(Category::CategoryII)
                .with_consumption(dec!(1), Uom::Mt, Decimal::ZERO)
                .with_used_recycled_percent(dec!(0.5))])
            .reconcile();

        let report = ComplianceReport::build(&workbook);

        assert_eq!(report.client_name, "ABC Foods");
        assert_eq!(report.procurement.rows, 3);
        assert_eq!(report.procurement.purchase_mt, dec!(8));
        assert_eq!(report.procurement.recycled_mt, dec!(2));
        assert_eq!(report.procurement_by_quarter.len(), 1);
        assert_eq!(report.procurement_by_quarter["Q1"].purchase_mt, dec!(4));

        assert_eq!(report.component_findings.len(), 1);
        assert_eq!(report.component_findings[0].component_code, "ABC/PLAN/Com/001");

        // 0.5 ÷ 100 × 100 = 0.5% < 10%
        assert_eq!(report.categories_below_target(), 1);
        assert!(report.to_json_pretty().unwrap().contains("\"procurementByQuarter\""));
    }
}
