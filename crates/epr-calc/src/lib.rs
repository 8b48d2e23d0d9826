//! # EPR Calculation Engine
//!
//! 代碼指派、衍生欄位、跨表連結與類別彙總

pub mod aggregate;
pub mod code_assign;
pub mod compliance;
pub mod derived;
pub mod linker;
pub mod report;
pub mod sequence;
pub mod tonnage;
pub mod validate;
pub mod workbook;

// Re-export 主要類型
pub use aggregate::CategoryAggregator;
pub use code_assign::{CodeAssigner, ComponentKey};
pub use compliance::{assess_thickness, category_status, ThicknessVerdict};
pub use derived::{resin_code, DerivedFieldCalculator};
pub use linker::{CrossTableLinker, LinkAttributes, LinkSources, LinkTarget};
pub use report::{ComplianceReport, ComponentFinding, ProcurementTotals};
pub use sequence::SequenceCounter;
pub use validate::RequiredFields;
pub use workbook::{Applied, EditEvent, Workbook};
