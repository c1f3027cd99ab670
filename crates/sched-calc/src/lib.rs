//! # Schedule Calculation
//!
//! 換線成本、時間軸展開、排程評分與比較

pub mod comparator;
pub mod evaluator;
pub mod switchover;
pub mod timeline;

// Re-export 主要類型
pub use comparator::{compare, improves};
pub use evaluator::{ScheduleEvaluator, ScoreBasis};
pub use switchover::{Switchover, SwitchoverPolicy};
pub use timeline::{MachineTimeline, Timeline, TimelineEntry};
