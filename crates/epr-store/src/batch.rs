//! 單列保存與批次保存
//!
//! 保存前先驗證；有阻擋性問題的列不送出，其他列照常保存。
//! 儲存端失敗時立即停止：之前的列已保存，失敗列與之後的列都未保存，
//! 本地工作簿維持原樣，由使用者重試。

use epr_calc::{Applied, EditEvent, Workbook};
use epr_core::{
    ComponentRow, EngineConfig, MonthlyProcurementRow, ProductRow, RecycledUsageRow, Row, RowIssues,
    RowRef, SupplierRow,
};

use crate::snapshot::SnapshotTracker;
use crate::store::{RecordStore, RowFilter};
use crate::StoreError;

/// 保存結果
#[derive(Debug, Default)]
pub struct SaveReport {
    /// 已保存
    pub saved: Vec<RowRef>,
    /// 驗證未通過（未送出）
    pub rejected: Vec<RowIssues>,
    /// 儲存端失敗的列
    pub failed: Option<(RowRef, StoreError)>,
    /// 因儲存端失敗而未嘗試
    pub not_attempted: Vec<RowRef>,
}

impl SaveReport {
    /// 所有列都已保存
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_none() && self.not_attempted.is_empty()
    }
}

/// 工作簿與儲存端之間的保存流程
#[derive(Debug)]
pub struct Persistence<S: RecordStore> {
    store: S,
    snapshots: SnapshotTracker,
}

impl<S: RecordStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshots: SnapshotTracker::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn snapshots(&self) -> &SnapshotTracker {
        &self.snapshots
    }

    /// 從儲存端載入工作簿，並把載入的內容記為最後保存
    pub fn load(&mut self, config: EngineConfig) -> Result<Workbook, StoreError> {
        config.validate()?;
        self.snapshots.clear();

        let workbook = Workbook::new(config)
            .with_products(self.load_rows::<ProductRow>()?)
            .with_suppliers(self.load_rows::<SupplierRow>()?)
            .with_components(self.load_rows::<ComponentRow>()?)
            .with_monthly_procurement(self.load_rows::<MonthlyProcurementRow>()?)
            .with_recycled_usage(self.load_rows::<RecycledUsageRow>()?)
            .reconcile();

        tracing::info!("從儲存端載入 {} 筆已保存的資料列", self.snapshots.len());
        Ok(workbook)
    }

    fn load_rows<T: Row>(&mut self) -> Result<Vec<T>, StoreError> {
        let values = self.store.get(T::COLLECTION, &RowFilter::all())?;
        let mut rows = Vec::with_capacity(values.len());

        for value in values {
            let has_id = value.get("id").is_some();
            let row: T = serde_json::from_value(value)?;
            // 沒有 ID 的舊資料剛配發新 ID，視為尚未保存
            if has_id {
                self.snapshots
                    .mark_saved(row.reference(), serde_json::to_value(&row)?);
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// 需要保存的列
    pub fn dirty_rows(&self, workbook: &Workbook) -> Vec<RowRef> {
        self.snapshots.dirty_rows(workbook)
    }

    /// 保存單一資料列
    pub fn save_row(&mut self, workbook: &Workbook, row: RowRef) -> Result<SaveReport, StoreError> {
        let mut report = SaveReport::default();
        self.save_into(workbook, row, &mut report)?;
        Ok(report)
    }

    /// 保存所有有變動的資料列
    pub fn save_all(&mut self, workbook: &Workbook) -> Result<SaveReport, StoreError> {
        let pending = self.dirty_rows(workbook);
        let mut report = SaveReport::default();

        for (position, row) in pending.iter().enumerate() {
            self.save_into(workbook, *row, &mut report)?;
            if report.failed.is_some() {
                report.not_attempted = pending[position + 1..].to_vec();
                break;
            }
        }

        tracing::info!(
            "批次保存: 已保存 {} 筆, 驗證未通過 {} 筆, 失敗 {} 筆, 未嘗試 {} 筆",
            report.saved.len(),
            report.rejected.len(),
            usize::from(report.failed.is_some()),
            report.not_attempted.len()
        );

        Ok(report)
    }

    /// 驗證並送出一列，結果寫入報告
    ///
    /// 只有工作簿本身的錯誤（找不到列、序列化失敗）會以 `Err` 回傳。
    fn save_into(
        &mut self,
        workbook: &Workbook,
        row: RowRef,
        report: &mut SaveReport,
    ) -> Result<(), StoreError> {
        let issues = workbook.validate_row(row)?;
        if issues.blocks_save() {
            tracing::warn!("資料列 {} 未通過驗證: {}", row, issues.message());
            report.rejected.push(issues);
            return Ok(());
        }

        let value = workbook.row_value(row)?;
        match self.store.put(row.collection, vec![value.clone()]) {
            Ok(saved) => {
                let stored = saved.into_iter().next().unwrap_or(value);
                self.snapshots.mark_saved(row, stored);
                report.saved.push(row);
            }
            Err(err) => {
                tracing::warn!("資料列 {} 保存失敗: {}", row, err);
                report.failed = Some((row, err));
            }
        }

        Ok(())
    }

    /// 取消編輯，還原最後保存的內容
    pub fn cancel(&self, workbook: &Workbook, row: RowRef) -> Result<Applied, StoreError> {
        Ok(self.snapshots.cancel(workbook, row)?)
    }

    /// 刪除資料列
    ///
    /// 已保存過的列先從儲存端刪除，成功後才忘掉快照並回傳新工作簿；
    /// 儲存端失敗時快照保留，呼叫端沿用原工作簿。從未保存的列只在本地刪除。
    pub fn delete_row(&mut self, workbook: &Workbook, row: RowRef) -> Result<Applied, StoreError> {
        let applied = workbook.apply(EditEvent::DeleteRow { row })?;

        if self.snapshots.last_saved(row).is_some() {
            if let Err(err) = self.store.delete(row.collection, row.id) {
                tracing::warn!("刪除 {} 失敗: {}", row, err);
                return Err(err);
            }
            tracing::info!("已從儲存端刪除 {}", row);
        }

        self.snapshots.forget(row);
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use epr_core::{Collection, SupplierStatus};
    use serde_json::json;

    fn supplier(name: &str) -> SupplierRow {
        SupplierRow {
            system_code: "ABC/Com/001".to_string(),
            ..SupplierRow::new()
        }
        .with_component_code("ABC/PLAN/Com/001")
        .with_supplier(name)
        .with_status(SupplierStatus::Unregistered)
    }

    fn workbook(suppliers: Vec<SupplierRow>) -> Workbook {
        Workbook::new(EngineConfig::new("ABC", "PLANT")).with_suppliers(suppliers)
    }

    #[test]
    fn test_save_all_then_clean() {
        let wb = workbook(vec![supplier("Acme"), supplier("Beta")]);
        let mut persistence = Persistence::new(InMemoryStore::new());

        let report = persistence.save_all(&wb).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.saved.len(), 2);
        assert_eq!(persistence.store().len(Collection::Suppliers), 2);

        // 沒有變動就不再送出
        let again = persistence.save_all(&wb).unwrap();
        assert!(again.saved.is_empty());
        assert_eq!(persistence.store().put_calls(), 2);
    }

    #[test]
    fn test_invalid_row_does_not_block_siblings() {
        let mut invalid = supplier("Gamma");
        invalid.supplier_name.clear();
        let wb = workbook(vec![supplier("Acme"), invalid.clone(), supplier("Beta")]);
        let mut persistence = Persistence::new(InMemoryStore::new());

        let report = persistence.save_all(&wb).unwrap();
        assert_eq!(report.saved.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, invalid.reference());
        assert!(report.failed.is_none());
    }

    #[test]
    fn test_store_failure_stops_batch() {
        let rows = vec![supplier("A"), supplier("B"), supplier("C"), supplier("D")];
        let refs: Vec<RowRef> = rows.iter().map(Row::reference).collect();
        let wb = workbook(rows);

        let mut store = InMemoryStore::new();
        store.fail_on(refs[2].id);
        let mut persistence = Persistence::new(store);

        let report = persistence.save_all(&wb).unwrap();
        assert_eq!(report.saved, refs[..2].to_vec());
        assert_eq!(report.failed.as_ref().map(|(row, _)| *row), Some(refs[2]));
        assert_eq!(report.not_attempted, vec![refs[3]]);
        assert_eq!(persistence.store().len(Collection::Suppliers), 2);

        // 失敗列與未嘗試的列仍是髒的，可以重試
        assert_eq!(persistence.dirty_rows(&wb), refs[2..].to_vec());
    }

    #[test]
    fn test_load_marks_rows_saved() {
        let stored = supplier("Acme");
        let store = InMemoryStore::new()
            .with_rows(Collection::Suppliers, vec![serde_json::to_value(&stored).unwrap()])
            .with_rows(Collection::Products, vec![json!({ "skuCode": "LEGACY" })]);
        let mut persistence = Persistence::new(store);

        let wb = persistence.load(EngineConfig::new("ABC", "PLANT")).unwrap();
        assert_eq!(wb.suppliers, vec![stored]);
        assert_eq!(wb.products[0].system_code, "ABC/Com/001");

        // 舊資料沒有 ID，需要保存
        assert_eq!(persistence.dirty_rows(&wb), vec![wb.products[0].reference()]);
    }

    #[test]
    fn test_delete_forgets_snapshot() {
        let row = supplier("Acme");
        let reference = row.reference();
        let wb = workbook(vec![row]);
        let mut persistence = Persistence::new(InMemoryStore::new());
        persistence.save_row(&wb, reference).unwrap();
        assert!(persistence.snapshots().last_saved(reference).is_some());

        let applied = persistence.delete_row(&wb, reference).unwrap();
        assert!(applied.workbook.suppliers.is_empty());
        assert!(persistence.snapshots().last_saved(reference).is_none());
        assert_eq!(persistence.store().len(Collection::Suppliers), 0);

        // 重新載入後不會再出現
        let mut reloaded = Persistence::new(persistence.store().clone());
        let loaded = reloaded.load(EngineConfig::new("ABC", "PLANT")).unwrap();
        assert!(loaded.suppliers.is_empty());
    }

    #[test]
    fn test_delete_unsaved_row_stays_local() {
        let row = supplier("Acme");
        let reference = row.reference();
        let wb = workbook(vec![row]);
        let mut persistence = Persistence::new(InMemoryStore::new());
        persistence.store_mut().set_offline(true);

        // 從未保存，不需要連線儲存端
        let applied = persistence.delete_row(&wb, reference).unwrap();
        assert!(applied.workbook.suppliers.is_empty());
    }

    #[test]
    fn test_failed_store_delete_keeps_snapshot() {
        let row = supplier("Acme");
        let reference = row.reference();
        let wb = workbook(vec![row]);
        let mut persistence = Persistence::new(InMemoryStore::new());
        persistence.save_row(&wb, reference).unwrap();

        persistence.store_mut().set_offline(true);
        let result = persistence.delete_row(&wb, reference);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(persistence.snapshots().last_saved(reference).is_some());

        persistence.store_mut().recover();
        assert!(persistence.delete_row(&wb, reference).is_ok());
        assert_eq!(persistence.store().len(Collection::Suppliers), 0);
    }

    #[test]
    fn test_offline_store_leaves_workbook_unchanged() {
        let wb = workbook(vec![supplier("Acme")]);
        let mut store = InMemoryStore::new();
        store.set_offline(true);
        let mut persistence = Persistence::new(store);

        let report = persistence.save_all(&wb).unwrap();
        assert!(report.saved.is_empty());
        assert!(report.failed.is_some());
        assert_eq!(persistence.dirty_rows(&wb).len(), 1);
    }
}
