//! # EPR Core
//!
//! 合規資料列模型與類型定義

pub mod calendar;
pub mod component;
pub mod config;
pub mod issue;
pub mod procurement;
pub mod product;
pub mod recycled;
pub mod row;
pub mod serde_util;
pub mod summary;
pub mod supplier;
pub mod units;

// Re-export 主要類型
pub use calendar::InvoicePeriod;
pub use component::{Category, ComponentRow};
pub use config::{CategoryTarget, EngineConfig, SequenceMode, ThicknessPolicy, ThicknessRule};
pub use issue::{IssueSeverity, RowIssue, RowIssues};
pub use procurement::MonthlyProcurementRow;
pub use product::{ProductRow, YesNo};
pub use recycled::RecycledUsageRow;
pub use row::{Collection, Row, RowId, RowRef};
pub use summary::{CategorySummaryRow, ComplianceStatus};
pub use supplier::{SupplierRow, SupplierStatus};
pub use units::Uom;

/// EPR 引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum EprError {
    #[error("找不到資料列: {0}")]
    RowNotFound(RowRef),

    #[error("集合 {collection} 沒有欄位: {field}")]
    UnknownField { collection: Collection, field: String },

    #[error("欄位 {field} 的值無效: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("欄位 {field} 不支援失焦正規化")]
    NotAPercentField { field: String },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EprError>;
