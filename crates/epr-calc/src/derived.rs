//! 衍生欄位計算
//!
//! 每次欄位寫入後重算衍生欄位。所有函式都是純函式且具冪等性：
//! 對同一列重算兩次與重算一次結果相同。

use epr_core::{ComponentRow, EprError, InvoicePeriod, MonthlyProcurementRow, RecycledUsageRow, Result};
use rust_decimal::Decimal;

use crate::tonnage::{amount_for, fixed3, normalize_percent, to_metric_tons};

/// 衍生欄位計算器
pub struct DerivedFieldCalculator;

impl DerivedFieldCalculator {
    /// 重算每月採購列
    ///
    /// 比例欄位只在計算時正規化，不改寫使用者輸入（失焦時才改寫，見
    /// [`DerivedFieldCalculator::commit_monthly_percent`]）。計算溢位時記錄警告，
    /// 衍生欄位歸零。
    pub fn recompute_monthly_row(row: MonthlyProcurementRow) -> MonthlyProcurementRow {
        match Self::try_recompute_monthly_row(row.clone()) {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("每月採購列 {} 無法重算: {}", row.id, err);
                let mut row = row;
                row.set_period(InvoicePeriod::from_invoice_date(&row.date_of_invoice));
                row.monthly_purchase_mt = Decimal::ZERO;
                row.recycled_qty = Decimal::ZERO;
                row.recycled_qrt_amount = Decimal::ZERO;
                row.virgin_qty = Decimal::ZERO;
                row.virgin_qty_amount = Decimal::ZERO;
                row
            }
        }
    }

    /// 重算每月採購列；任何乘積超出數值範圍時回傳 [`EprError::InvalidValue`]
    pub fn try_recompute_monthly_row(mut row: MonthlyProcurementRow) -> Result<MonthlyProcurementRow> {
        row.set_period(InvoicePeriod::from_invoice_date(&row.date_of_invoice));

        let tonnage = to_metric_tons(
            row.purchase_qty,
            row.uom.as_ref(),
            row.per_piece_weight_kg,
            row.monthly_purchase_mt,
        )
        .ok_or_else(|| out_of_range("purchaseQty"))?;
        if tonnage.reset_inputs {
            row.purchase_qty = Decimal::ZERO;
            row.per_piece_weight_kg = Decimal::ZERO;
        }
        row.monthly_purchase_mt = tonnage.mt;

        let fraction = normalize_percent(row.recycled_percent);
        row.recycled_qty = row
            .monthly_purchase_mt
            .checked_mul(fraction)
            .ok_or_else(|| out_of_range("recycledPercent"))?;
        row.recycled_qrt_amount =
            amount_for(row.recycled_qty, row.recycled_rate).ok_or_else(|| out_of_range("recycledRate"))?;

        let virgin = row
            .monthly_purchase_mt
            .checked_sub(row.recycled_qty)
            .ok_or_else(|| out_of_range("recycledPercent"))?;
        row.virgin_qty = fixed3(virgin);
        row.virgin_qty_amount =
            amount_for(row.virgin_qty, row.virgin_rate).ok_or_else(|| out_of_range("virginRate"))?;

        Ok(row)
    }

    /// 重算再生料使用列；溢位時記錄警告並把衍生欄位歸零
    pub fn recompute_recycled_usage_row(row: RecycledUsageRow) -> RecycledUsageRow {
        match Self::try_recompute_recycled_usage_row(row.clone()) {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("再生料使用列 {} 無法重算: {}", row.id, err);
                let mut row = row;
                row.annual_consumption_mt = Decimal::ZERO;
                row.used_recycled_qty_mt = Decimal::ZERO;
                row
            }
        }
    }

    pub fn try_recompute_recycled_usage_row(mut row: RecycledUsageRow) -> Result<RecycledUsageRow> {
        let tonnage = to_metric_tons(
            row.annual_consumption,
            row.uom.as_ref(),
            row.per_piece_weight,
            row.annual_consumption_mt,
        )
        .ok_or_else(|| out_of_range("annualConsumption"))?;
        if tonnage.reset_inputs {
            row.annual_consumption = Decimal::ZERO;
            row.per_piece_weight = Decimal::ZERO;
        }
        row.annual_consumption_mt = tonnage.mt;

        let fraction = normalize_percent(row.used_recycled_percent);
        row.used_recycled_qty_mt = row
            .annual_consumption_mt
            .checked_mul(fraction)
            .ok_or_else(|| out_of_range("usedRecycledPercent"))?;

        Ok(row)
    }

    /// 重算組件列：清除不適用的條件欄位，並在未填時帶入樹脂辨識碼
    pub fn recompute_component_row(mut row: ComponentRow) -> ComponentRow {
        row.clear_conditional_fields();

        if row.polymer_code.is_none() {
            row.polymer_code = resin_code(&row.component_polymer);
        }

        row
    }

    /// 失焦：把再生料比例改寫成三位小數的分數，再重算
    pub fn commit_monthly_percent(mut row: MonthlyProcurementRow) -> Result<MonthlyProcurementRow> {
        row.recycled_percent = fixed3(normalize_percent(row.recycled_percent));
        Self::try_recompute_monthly_row(row)
    }

    /// 失焦：把使用比例改寫成三位小數的分數，再重算
    pub fn commit_recycled_percent(mut row: RecycledUsageRow) -> Result<RecycledUsageRow> {
        row.used_recycled_percent = fixed3(normalize_percent(row.used_recycled_percent));
        Self::try_recompute_recycled_usage_row(row)
    }
}

fn out_of_range(field: &str) -> EprError {
    EprError::InvalidValue {
        field: field.to_string(),
        reason: "計算結果超出數值範圍".to_string(),
    }
}

/// 由聚合物名稱推導樹脂辨識碼（1–7）；未填寫回傳 `None`
pub fn resin_code(polymer: &str) -> Option<u8> {
    let normalized = polymer.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return None;
    }

    let code = match normalized.as_str() {
        "PET" | "PETE" => 1,
        "HDPE" => 2,
        "PVC" => 3,
        "LDPE" | "LLDPE" => 4,
        "PP" => 5,
        "PS" => 6,
        _ => 7,
    };
    Some(code)
}
