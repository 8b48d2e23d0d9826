//! # EPR
//!
//! 塑膠包材延伸生產者責任（EPR）合規資料整合引擎
//!
//! - [`core`]: 資料列模型、引擎配置與驗證問題
//! - [`calc`]: 代碼指派、衍生欄位、跨表連結與類別彙總
//! - [`store`]: 儲存端介面與批次保存

pub use epr_calc as calc;
pub use epr_core as core;
pub use epr_store as store;

// Re-export 主要類型
pub use epr_calc::{Applied, ComplianceReport, EditEvent, Workbook};
pub use epr_core::{Collection, EngineConfig, EprError, Result, RowRef};
pub use epr_store::{InMemoryStore, Persistence, RecordStore, SaveReport, StoreError};
