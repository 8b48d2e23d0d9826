//! 類別彙總列（計算結果，不作為輸入保存）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 未填類別的再生料使用列歸入此桶
pub const UNSPECIFIED_CATEGORY: &str = "Unspecified";

/// 單一類別的再生料彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryRow {
    /// 類別標籤
    pub category: String,

    /// 年度消耗量合計（公噸）
    pub total_annual_consumption_mt: Decimal,

    /// 再生料比例合計 ÷ 100
    pub total_used_percent: Decimal,

    /// 再生料數量合計（公噸）
    pub total_used_qty_mt: Decimal,

    /// 與法規目標比較的結果
    pub status: ComplianceStatus,
}

impl CategorySummaryRow {
    /// 創建空的彙總列
    pub fn new(category: String) -> Self {
        Self {
            category,
            total_annual_consumption_mt: Decimal::ZERO,
            total_used_percent: Decimal::ZERO,
            total_used_qty_mt: Decimal::ZERO,
            status: ComplianceStatus::Neutral,
        }
    }

    /// 以百分比表示的使用比例（與目標比較用）
    pub fn used_percent_points(&self) -> Decimal {
        self.total_used_percent * Decimal::ONE_HUNDRED
    }
}

/// 類別合規狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ComplianceStatus {
    /// 達到目標
    Compliant { target_percent: Decimal },
    /// 低於目標（僅提示，不阻擋保存）
    BelowTarget { target_percent: Decimal },
    /// 該類別沒有目標
    Neutral,
}

impl ComplianceStatus {
    pub fn is_below_target(&self) -> bool {
        matches!(self, ComplianceStatus::BelowTarget { .. })
    }
}
