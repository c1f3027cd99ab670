//! # Schedule History
//!
//! 排程快照紀錄與瀏覽游標

pub mod cursor;
pub mod ledger;

// Re-export 主要類型
pub use cursor::HistoryCursor;
pub use ledger::{Snapshot, SnapshotLedger};
