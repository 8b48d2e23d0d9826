//! # EPR Store
//!
//! 儲存端介面、最後保存快照與批次保存

pub mod batch;
pub mod snapshot;
pub mod store;

use epr_core::{Collection, EprError};

// Re-export 主要類型
pub use batch::{Persistence, SaveReport};
pub use snapshot::SnapshotTracker;
pub use store::{InMemoryStore, RecordStore, RowFilter};

/// 儲存端錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("儲存端拒絕寫入 {collection}: {reason}")]
    Rejected { collection: Collection, reason: String },

    #[error("儲存端無法使用: {0}")]
    Unavailable(String),

    #[error("資料格式錯誤: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EprError),
}
