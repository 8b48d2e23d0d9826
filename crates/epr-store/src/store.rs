//! 儲存端介面
//!
//! 儲存端只提供 `get` / `put` / `delete` 三個操作，資料以 JSON 進出。
//! HTTP 路由、檔案上傳等細節都在這個介面之外。

use std::collections::{HashMap, HashSet};

use epr_core::{Collection, RowId};
use serde_json::Value;

use crate::StoreError;

/// 查詢條件（欄位相等，全部成立才符合）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    equals: Vec<(String, Value)>,
}

impl RowFilter {
    /// 不設條件
    pub fn all() -> Self {
        Self::default()
    }

    /// 建構器模式：加上欄位相等條件
    pub fn field_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.equals.push((field.to_string(), value.into()));
        self
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.equals
            .iter()
            .all(|(field, expected)| row.get(field) == Some(expected))
    }
}

/// 資料列儲存端
pub trait RecordStore {
    /// 讀取集合中符合條件的資料列
    fn get(&self, collection: Collection, filter: &RowFilter) -> Result<Vec<Value>, StoreError>;

    /// 寫入資料列（依 `id` 新增或覆蓋），回傳儲存端保存後的資料列
    fn put(&mut self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>, StoreError>;

    /// 刪除資料列；回傳儲存端是否確實有這一列
    fn delete(&mut self, collection: Collection, id: RowId) -> Result<bool, StoreError>;
}

/// 記憶體儲存端（測試與示範用）
///
/// 可以指定某些資料列寫入失敗，或讓整個儲存端離線。
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: HashMap<Collection, Vec<Value>>,
    failing_rows: HashSet<String>,
    offline: bool,
    put_calls: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：預先放入資料列
    pub fn with_rows(mut self, collection: Collection, rows: Vec<Value>) -> Self {
        self.collections.entry(collection).or_default().extend(rows);
        self
    }

    /// 寫入此 ID 的資料列時回傳拒絕
    pub fn fail_on(&mut self, id: RowId) {
        self.failing_rows.insert(id.to_string());
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// 清除所有模擬的失敗
    pub fn recover(&mut self) {
        self.failing_rows.clear();
        self.offline = false;
    }

    /// `put` 被呼叫的次數
    pub fn put_calls(&self) -> usize {
        self.put_calls
    }

    /// 集合中的資料列數
    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.values().all(Vec::is_empty)
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

impl RecordStore for InMemoryStore {
    fn get(&self, collection: Collection, filter: &RowFilter) -> Result<Vec<Value>, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable(format!("讀取 {} 失敗", collection)));
        }

        Ok(self
            .collections
            .get(&collection)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    fn put(&mut self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        self.put_calls += 1;

        if self.offline {
            return Err(StoreError::Unavailable(format!("寫入 {} 失敗", collection)));
        }

        // 先檢查整批，任何一列有問題就整批不寫入
        for row in &rows {
            let id = row_id(row).ok_or_else(|| StoreError::Rejected {
                collection,
                reason: "資料列缺少 id".to_string(),
            })?;
            if self.failing_rows.contains(id) {
                return Err(StoreError::Rejected {
                    collection,
                    reason: format!("資料列 {} 寫入失敗", id),
                });
            }
        }

        let stored = self.collections.entry(collection).or_default();
        for row in &rows {
            let id = row_id(row);
            match stored.iter_mut().find(|existing| row_id(existing) == id) {
                Some(existing) => *existing = row.clone(),
                None => stored.push(row.clone()),
            }
        }

        Ok(rows)
    }

    fn delete(&mut self, collection: Collection, id: RowId) -> Result<bool, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable(format!("刪除 {} 失敗", collection)));
        }

        let id = id.to_string();
        if self.failing_rows.contains(&id) {
            return Err(StoreError::Rejected {
                collection,
                reason: format!("資料列 {} 刪除失敗", id),
            });
        }

        let Some(stored) = self.collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = stored.len();
        stored.retain(|row| row_id(row) != Some(id.as_str()));
        Ok(stored.len() < before)
    }
}
