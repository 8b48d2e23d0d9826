//! 類別再生料彙總

use epr_core::{CategorySummaryRow, EngineConfig, RecycledUsageRow, RowIssue};
use rust_decimal::Decimal;

use crate::compliance::category_status;

/// 類別彙總器
pub struct CategoryAggregator;

impl CategoryAggregator {
    /// 依類別彙總再生料使用列（保持類別首次出現的順序）
    ///
    /// 使用比例合計是「各列分數之和 ÷ 100」。結果的狀態一律為中性，
    /// 需要與目標比較時使用 [`CategoryAggregator::summarize`]。
    pub fn aggregate_category_summary(rows: &[RecycledUsageRow]) -> Vec<CategorySummaryRow> {
        let mut summary: Vec<CategorySummaryRow> = Vec::new();
        let mut percent_sums: Vec<Decimal> = Vec::new();

        for row in rows {
            let label = row.category_label();
            let index = match summary.iter().position(|s| s.category == label) {
                Some(index) => index,
                None => {
                    summary.push(CategorySummaryRow::new(label.to_string()));
                    percent_sums.push(Decimal::ZERO);
                    summary.len() - 1
                }
            };

            let bucket = &mut summary[index];
            bucket.total_annual_consumption_mt += row.annual_consumption_mt;
            bucket.total_used_qty_mt += row.used_recycled_qty_mt;
            percent_sums[index] += row.used_recycled_percent;
        }

        for (bucket, percent_sum) in summary.iter_mut().zip(percent_sums) {
            bucket.total_used_percent = percent_sum / Decimal::ONE_HUNDRED;
        }

        tracing::debug!("彙總 {} 筆再生料使用列為 {} 個類別", rows.len(), summary.len());

        summary
    }

    /// 彙總並與設定的類別目標比較
    pub fn summarize(rows: &[RecycledUsageRow], config: &EngineConfig) -> Vec<CategorySummaryRow> {
        let mut summary = Self::aggregate_category_summary(rows);

        for bucket in &mut summary {
            bucket.status = category_status(&bucket.category, bucket.used_percent_points(), config);
        }

        summary
    }

    /// 低於目標的類別轉成提示
    pub fn threshold_warnings(summary: &[CategorySummaryRow]) -> Vec<RowIssue> {
        summary
            .iter()
            .filter(|bucket| bucket.status.is_below_target())
            .map(|bucket| RowIssue::ThresholdWarning {
                subject: bucket.category.clone(),
                detail: format!("再生料比例 {}%", bucket.used_percent_points().normalize()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epr_core::{Category, ComplianceStatus};
    use rust_decimal_macros::dec;

    fn usage(category: Option<Category>, percent: Decimal, qty_mt: Decimal) -> RecycledUsageRow {
        RecycledUsageRow {
            category,
            used_recycled_percent: percent,
            used_recycled_qty_mt: qty_mt,
            annual_consumption_mt: dec!(100),
            ..RecycledUsageRow::new()
        }
    }

    #[test]
    fn test_category_one_summary() {
        let rows = vec![
            usage(Some(Category::CategoryI), dec!(0.3), dec!(10)),
            usage(Some(Category::CategoryI), dec!(0.4), dec!(20)),
        ];

        let summary = CategoryAggregator::aggregate_category_summary(&rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].category, "Category I");
        assert_eq!(summary[0].total_used_percent, dec!(0.007));
        assert_eq!(summary[0].total_used_qty_mt, dec!(30));
        assert_eq!(summary[0].total_annual_consumption_mt, dec!(200));
        assert_eq!(summary[0].status, ComplianceStatus::Neutral);
    }

    #[test]
    fn test_first_appearance_order_and_unspecified_bucket() {
        let rows = vec![
            usage(Some(Category::CategoryII), dec!(0.1), dec!(1)),
            usage(None, dec!(0.2), dec!(2)),
            usage(Some(Category::CategoryI), dec!(0.3), dec!(3)),
            usage(Some(Category::CategoryII), dec!(0.1), dec!(1)),
        ];

        let summary = CategoryAggregator::aggregate_category_summary(&rows);
        let labels: Vec<&str> = summary.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(labels, vec!["Category II", "Unspecified", "Category I"]);
        assert_eq!(summary[0].total_used_qty_mt, dec!(2));
    }

    #[test]
    fn test_summarize_assigns_status() {
        let rows = vec![
            usage(Some(Category::CategoryI), dec!(0.3), dec!(10)),
            usage(Some(Category::CategoryIII), dec!(0.9), dec!(10)),
        ];

        let summary = CategoryAggregator::summarize(&rows, &EngineConfig::default());
        assert_eq!(
            summary[0].status,
            ComplianceStatus::BelowTarget {
                target_percent: dec!(30)
            }
        );
        assert_eq!(summary[1].status, ComplianceStatus::Neutral);

        let warnings = CategoryAggregator::threshold_warnings(&summary);
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_blocking());
    }

    #[test]
    fn test_empty_input() {
        assert!(CategoryAggregator::aggregate_category_summary(&[]).is_empty());
    }
}
