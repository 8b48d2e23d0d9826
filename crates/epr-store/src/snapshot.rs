//! 最後保存快照追蹤
//!
//! 記住每一列最後一次成功保存的內容，用來判斷哪些列需要保存，
//! 以及取消編輯時還原。

use std::collections::HashMap;

use epr_calc::{Applied, Workbook};
use epr_core::{Collection, RowRef};
use serde_json::Value;

/// 快照追蹤器
#[derive(Debug, Clone, Default)]
pub struct SnapshotTracker {
    saved: HashMap<RowRef, Value>,
}

impl SnapshotTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 記錄保存成功的內容
    pub fn mark_saved(&mut self, row: RowRef, value: Value) {
        self.saved.insert(row, value);
    }

    pub fn last_saved(&self, row: RowRef) -> Option<&Value> {
        self.saved.get(&row)
    }

    /// 與最後保存的內容不同（或從未保存）即為髒
    pub fn is_dirty(&self, row: RowRef, current: &Value) -> bool {
        self.saved.get(&row) != Some(current)
    }

    /// 列已刪除，忘掉它的快照
    pub fn forget(&mut self, row: RowRef) {
        self.saved.remove(&row);
    }

    /// 工作簿中需要保存的列（依集合、再依顯示順序）
    pub fn dirty_rows(&self, workbook: &Workbook) -> Vec<RowRef> {
        [
            Collection::Products,
            Collection::Suppliers,
            Collection::Components,
            Collection::MonthlyProcurement,
            Collection::RecycledUsage,
        ]
        .into_iter()
        .flat_map(|collection| workbook.row_refs(collection))
        .filter(|row| {
            workbook
                .row_value(*row)
                .map(|value| self.is_dirty(*row, &value))
                .unwrap_or(true)
        })
        .collect()
    }

    /// 取消編輯：還原最後保存的內容；從未保存的列直接移除
    pub fn cancel(&self, workbook: &Workbook, row: RowRef) -> epr_core::Result<Applied> {
        let saved = self.saved.get(&row).cloned();
        if saved.is_none() {
            tracing::debug!("資料列 {} 從未保存，取消即移除", row);
        }
        workbook.restore_row(row, saved)
    }

    /// 追蹤中的列數
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// 清除所有快照
    pub fn clear(&mut self) {
        self.saved.clear();
    }
}
