//! 法規門檻判定（厚度、類別再生料目標）

use epr_core::{ComplianceStatus, ComponentRow, EngineConfig, RowIssue, ThicknessPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 厚度判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ThicknessVerdict {
    /// 厚度大於下限
    Compliant { min_micron: Decimal, actual: Decimal },
    /// 厚度小於或等於下限
    BelowMinimum { min_micron: Decimal, actual: Decimal },
    /// 類別不需檢查厚度
    NotAssessed,
}

impl ThicknessVerdict {
    pub fn is_compliant(&self) -> bool {
        matches!(self, ThicknessVerdict::Compliant { .. })
    }

    /// 未達下限時轉成不擋保存的警告
    pub fn to_issue(&self) -> Option<RowIssue> {
        match self {
            ThicknessVerdict::BelowMinimum { min_micron, actual } => {
                Some(RowIssue::ThresholdWarning {
                    subject: "thickness".to_string(),
                    detail: format!("{} 微米未大於下限 {} 微米", actual, min_micron),
                })
            }
            _ => None,
        }
    }
}

/// 判定組件厚度
///
/// 必須「大於」下限才算合規，等於下限視為不合規。
pub fn assess_thickness(row: &ComponentRow, policy: &ThicknessPolicy) -> ThicknessVerdict {
    let Some(min_micron) = policy.min_thickness(row.category, &row.category_ii_type) else {
        return ThicknessVerdict::NotAssessed;
    };

    let actual = row.thickness;
    if actual > min_micron {
        ThicknessVerdict::Compliant { min_micron, actual }
    } else {
        ThicknessVerdict::BelowMinimum { min_micron, actual }
    }
}

/// 類別狀態：以百分比與設定目標比較，沒有目標的類別為中性
pub fn category_status(
    category: &str,
    used_percent_points: Decimal,
    config: &EngineConfig,
) -> ComplianceStatus {
    match config.target_for(category) {
        Some(target_percent) if used_percent_points >= target_percent => {
            ComplianceStatus::Compliant { target_percent }
        }
        Some(target_percent) => ComplianceStatus::BelowTarget { target_percent },
        None => ComplianceStatus::Neutral,
    }
}
