//! 資料列驗證問題
//!
//! 問題附在出錯的資料列上，只會擋下該列的保存；
//! 同一批次的其他列照常保存。

use serde::{Deserialize, Serialize};

use crate::row::RowRef;

/// 問題嚴重度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueSeverity {
    /// 擋下保存
    Blocking,
    /// 僅顯示
    Warning,
}

/// 單一驗證問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RowIssue {
    /// 必填欄位缺漏
    #[error("缺少必填欄位: {}", .fields.join(", "))]
    MissingField { fields: Vec<String> },

    /// 代碼被不同自然鍵重複使用
    #[error("{field} {code} 已被「{existing_key}」使用，與「{conflicting_key}」衝突")]
    CodeCollision {
        field: String,
        code: String,
        existing_key: String,
        conflicting_key: String,
    },

    /// 自然鍵相同但代碼或屬性不一致
    #[error("{field} 不一致: {detail}")]
    Consistency { field: String, detail: String },

    /// 低於法規門檻（不擋保存）
    #[error("{subject} 未達門檻: {detail}")]
    ThresholdWarning { subject: String, detail: String },
}

impl RowIssue {
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowIssue::MissingField {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn consistency(field: &str, detail: impl Into<String>) -> Self {
        RowIssue::Consistency {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    pub fn severity(&self) -> IssueSeverity {
        match self {
            RowIssue::ThresholdWarning { .. } => IssueSeverity::Warning,
            _ => IssueSeverity::Blocking,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity() == IssueSeverity::Blocking
    }
}

/// 某一資料列的所有問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssues {
    pub row: RowRef,
    pub issues: Vec<RowIssue>,
}

impl RowIssues {
    pub fn new(row: RowRef) -> Self {
        Self {
            row,
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: RowIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// 是否有擋下保存的問題
    pub fn blocks_save(&self) -> bool {
        self.issues.iter().any(RowIssue::is_blocking)
    }

    /// 合併成一段顯示在資料列上的訊息
    pub fn message(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("；")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{Collection, RowId};

    #[test]
    fn test_missing_field_message() {
        let issue = RowIssue::missing(["skuCode", "supplierName"]);
        assert_eq!(issue.to_string(), "缺少必填欄位: skuCode, supplierName");
        assert!(issue.is_blocking());
    }

    #[test]
    fn test_threshold_warning_does_not_block() {
        let mut issues = RowIssues::new(RowRef::new(Collection::Components, RowId::new()));
        issues.push(RowIssue::ThresholdWarning {
            subject: "thickness".to_string(),
            detail: "100 ≤ 120".to_string(),
        });

        assert!(!issues.is_empty());
        assert!(!issues.blocks_save());

        issues.push(RowIssue::consistency("polymerType", "HDPE ≠ PET"));
        assert!(issues.blocks_save());
        assert_eq!(issues.issues.len(), 2);
    }

    #[test]
    fn test_duplicate_issue_is_ignored() {
        let mut issues = RowIssues::new(RowRef::new(Collection::Products, RowId::new()));
        issues.push(RowIssue::missing(["skuCode"]));
        issues.push(RowIssue::missing(["skuCode"]));
        assert_eq!(issues.issues.len(), 1);
        assert!(issues.message().contains("skuCode"));
    }
}
