//! # Prodsched
//!
//! 產線排程引擎：將訂單分派到可用機台並決定生產順序，
//! 以「總延遲 → makespan → 高成本換線數 → makespan 機台數」的字典序評分。
//!
//! - [`model`]：資料模型、配置、錯誤類型
//! - [`calc`]：換線規則、時間軸展開、評分與比較
//! - [`optimizer`]：建構式啟發法、局部搜尋、規劃工作階段
//! - [`history`]：快照紀錄與瀏覽游標

pub use sched_calc as calc;
pub use sched_core as model;
pub use sched_history as history;
pub use sched_optimizer as optimizer;

/// 常用類型
pub mod prelude {
    pub use sched_calc::{improves, ScheduleEvaluator, Timeline, TimelineEntry};
    pub use sched_core::{
        Color, EngineConfig, Machine, MachineId, OptimizerConfig, Order, OrderId, Problem,
        Product, ProductId, Result, SchedError, Schedule, Score, SwitchoverConfig, Time,
    };
    pub use sched_history::{HistoryCursor, Snapshot, SnapshotLedger};
    pub use sched_optimizer::{
        construct, optimize, optimize_step, Phase, PlanningSession, StepOutcome,
    };
}
