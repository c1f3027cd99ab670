//! # Sched Optimizer
//!
//! 排程求解：建構式啟發法、相關訂單篩選、鄰域搜尋與逐步執行的工作階段

pub mod construction;
pub mod local_search;
pub mod neighborhood;
pub mod relevance;
pub mod session;

#[cfg(test)]
mod test_support;

// Re-export 主要類型
pub use construction::{best_insertion, construct, construction_sequence, Construction, Insertion};
pub use local_search::{optimize_step, LocalSearch, SweepOutcome};
pub use neighborhood::{Move, Neighborhood, Slot};
pub use relevance::relevant_orders;
pub use session::{Phase, PlanningSession, StepOutcome};

use sched_core::{EngineConfig, InfeasibleOrder, Problem, Result, Schedule, Score};
use sched_history::SnapshotLedger;

/// 優化結果
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// 是否所有訂單都已排入
    pub feasible: bool,

    /// 最終排程
    pub schedule: Schedule,

    /// 最終評分
    pub score: Score,

    /// 完整快照紀錄
    pub ledger: SnapshotLedger,

    /// 未排入的訂單
    pub infeasible: Vec<InfeasibleOrder>,

    /// 改善輪數
    pub sweeps: usize,
}

/// 建構並執行局部搜尋直到局部最佳解（或達到 `max_sweeps`）
pub fn optimize(problem: Problem, config: EngineConfig) -> Result<OptimizationResult> {
    let mut session = PlanningSession::new(problem, config)?;
    session.run_to_local_optimum();

    let infeasible = session.infeasible_orders().to_vec();
    let sweeps = session.sweeps();
    let ledger = session.ledger().clone();
    let (schedule, score) = match ledger.last() {
        Some(snapshot) => (snapshot.schedule.clone(), snapshot.score.clone()),
        None => {
            let schedule = session.problem().empty_schedule();
            let score = Score::zero(schedule.machines());
            (schedule, score)
        }
    };

    Ok(OptimizationResult {
        feasible: infeasible.is_empty(),
        schedule,
        score,
        ledger,
        infeasible,
        sweeps,
    })
}
