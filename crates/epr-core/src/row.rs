//! 資料列識別與集合

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 資料列 ID（建立時指派，之後不再變動）
///
/// 顯示順序只由集合內的位置決定，所有定址都透過 ID，
/// 刪除其他列不會讓正在編輯的列錯位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    /// 產生新的資料列 ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// 舊資料沒有 ID 時，反序列化會經由這裡補上新的 ID
impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 資料列集合
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Collection {
    /// 產品 SKU 與包材
    Products,
    /// 供應商
    Suppliers,
    /// 包材組件
    Components,
    /// 每月採購
    MonthlyProcurement,
    /// 再生料使用
    RecycledUsage,
}

/// 資料列參照 `(集合, ID)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowRef {
    pub collection: Collection,
    pub id: RowId,
}

impl RowRef {
    pub fn new(collection: Collection, id: RowId) -> Self {
        Self { collection, id }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// 所有資料列型別的共同介面
pub trait Row: Clone + PartialEq + Serialize + DeserializeOwned {
    /// 所屬集合
    const COLLECTION: Collection;

    fn id(&self) -> RowId;

    fn reference(&self) -> RowRef {
        RowRef::new(Self::COLLECTION, self.id())
    }
}
