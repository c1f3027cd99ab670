//! 規劃工作階段
//!
//! 以單步驅動整個流程：未初始化 → 建構中 → 建構完成 → 最佳化中 → 局部最佳解。
//! 建構期間每一步插入一張訂單，最佳化期間每一步執行一輪搜尋；
//! 每次提交都會在快照紀錄中新增一筆。

use serde::{Deserialize, Serialize};

use sched_calc::{ScheduleEvaluator, Timeline};
use sched_core::{
    EngineConfig, InfeasibleOrder, MachineId, OrderId, Problem, Result, Schedule, Score,
};
use sched_history::{Snapshot, SnapshotLedger};

use crate::construction::{best_insertion, construction_sequence};
use crate::local_search::{LocalSearch, SweepOutcome};
use crate::neighborhood::Move;

/// 工作階段狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Constructing,
    Constructed,
    Optimizing,
    LocalOptimum,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Constructing => "constructing",
            Phase::Constructed => "constructed",
            Phase::Optimizing => "optimizing",
            Phase::LocalOptimum => "local_optimum",
        }
    }

    /// 建構是否已完成
    pub fn is_constructed(&self) -> bool {
        matches!(
            self,
            Phase::Constructed | Phase::Optimizing | Phase::LocalOptimum
        )
    }
}

/// 單步執行的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// 插入一張訂單
    Inserted {
        order: OrderId,
        machine: MachineId,
        position: usize,
    },
    /// 沒有可排入的訂單，直接完成建構
    NothingToInsert,
    /// 局部搜尋找到改善
    Improved { iteration: usize, applied: Move },
    /// 已達局部最佳解（重複呼叫不會再改變狀態）
    LocalOptimum,
}

/// 規劃工作階段
#[derive(Debug, Clone)]
pub struct PlanningSession {
    problem: Problem,
    config: EngineConfig,
    phase: Phase,
    ledger: SnapshotLedger,
    pending: Vec<OrderId>,
    next_pending: usize,
    infeasible: Vec<InfeasibleOrder>,
    sweeps: usize,
}

impl PlanningSession {
    /// 創建工作階段（會驗證配置）
    pub fn new(problem: Problem, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        problem.check_horizon(&config.switchover)?;

        Ok(Self {
            problem,
            config,
            phase: Phase::Uninitialized,
            ledger: SnapshotLedger::new(),
            pending: Vec::new(),
            next_pending: 0,
            infeasible: Vec::new(),
            sweeps: 0,
        })
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ledger(&self) -> &SnapshotLedger {
        &self.ledger
    }

    /// 目前（最後一筆）快照；未初始化時為 None
    pub fn current(&self) -> Option<&Snapshot> {
        self.ledger.last()
    }

    /// 無可用機台、未排入的訂單（初始化後才有值）
    pub fn infeasible_orders(&self) -> &[InfeasibleOrder] {
        &self.infeasible
    }

    /// 已執行的改善輪數
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// 展開指定快照的時間軸
    pub fn timeline(&self, index: usize) -> Option<Timeline> {
        let snapshot = self.ledger.get(index)?;
        Some(self.evaluator().expand(&snapshot.schedule))
    }

    fn evaluator(&self) -> ScheduleEvaluator<'_> {
        ScheduleEvaluator::new(&self.problem, &self.config.switchover)
    }

    fn current_state(&self) -> (Schedule, Score) {
        match self.ledger.last() {
            Some(snapshot) => (snapshot.schedule.clone(), snapshot.score.clone()),
            None => {
                let schedule = self.problem.empty_schedule();
                let score = self.evaluator().score(&schedule);
                (schedule, score)
            }
        }
    }

    /// 前進一步
    pub fn step(&mut self) -> StepOutcome {
        match self.phase {
            Phase::Uninitialized => {
                self.initialize();
                self.insert_next()
            }
            Phase::Constructing => self.insert_next(),
            Phase::Constructed | Phase::Optimizing => self.improve(),
            Phase::LocalOptimum => StepOutcome::LocalOptimum,
        }
    }

    /// 執行到建構完成
    pub fn run_construction(&mut self) {
        while !self.phase.is_constructed() {
            self.step();
        }
    }

    /// 執行到局部最佳解（受 `max_sweeps` 限制），返回本次呼叫的改善輪數
    pub fn run_to_local_optimum(&mut self) -> usize {
        self.run_construction();

        let mut improvements = 0;
        while self.phase != Phase::LocalOptimum {
            if let Some(max) = self.config.optimizer.max_sweeps {
                if self.sweeps >= max {
                    tracing::info!("已達最大改善輪數 {}", max);
                    break;
                }
            }

            if let StepOutcome::Improved { .. } = self.step() {
                improvements += 1;
            }
        }

        improvements
    }

    fn initialize(&mut self) {
        let (pending, infeasible) = construction_sequence(&self.problem);

        tracing::info!(
            "初始化工作階段：待排訂單 {} 筆，無可用機台 {} 筆",
            pending.len(),
            infeasible.len()
        );
        for item in &infeasible {
            tracing::warn!("{}", item);
        }

        let schedule = self.problem.empty_schedule();
        let score = self.evaluator().score(&schedule);

        self.ledger = SnapshotLedger::with_initial(schedule, score);
        self.pending = pending;
        self.next_pending = 0;
        self.infeasible = infeasible;
        self.sweeps = 0;
        self.phase = Phase::Constructing;
    }

    fn insert_next(&mut self) -> StepOutcome {
        let Some(&order_id) = self.pending.get(self.next_pending) else {
            self.finish_construction();
            return StepOutcome::NothingToInsert;
        };
        self.next_pending += 1;

        let (schedule, score) = self.current_state();
        let evaluator = self.evaluator();
        let order = self.problem.resolve_order(order_id);

        let outcome = match best_insertion(&evaluator, &schedule, &score, order) {
            Some(insertion) => {
                tracing::debug!(
                    "插入訂單 {} → 機台 {} 位置 {}",
                    order_id,
                    insertion.machine,
                    insertion.position
                );

                let committed = evaluator.score(&insertion.schedule);
                let outcome = StepOutcome::Inserted {
                    order: order_id,
                    machine: insertion.machine,
                    position: insertion.position,
                };
                self.ledger.record(insertion.schedule, committed);
                outcome
            }
            // 待排清單只含有可用機台的訂單
            None => StepOutcome::NothingToInsert,
        };

        if self.next_pending >= self.pending.len() {
            self.finish_construction();
        }

        outcome
    }

    fn finish_construction(&mut self) {
        self.ledger.mark_construction_end();
        self.phase = Phase::Constructed;

        if let Some(snapshot) = self.ledger.last() {
            tracing::info!(
                "建構完成：總延遲 {}，makespan {}，高成本換線 {}",
                snapshot.score.total_tardiness,
                snapshot.score.makespan,
                snapshot.score.costly_switchovers
            );
        }
    }

    fn improve(&mut self) -> StepOutcome {
        let (schedule, score) = self.current_state();
        let outcome = LocalSearch::new(&self.problem, &self.config).sweep(&schedule, &score);

        match outcome {
            SweepOutcome::Improved {
                schedule,
                score,
                applied,
                evaluated,
            } => {
                self.sweeps += 1;
                tracing::debug!(
                    "第 {} 輪：{}（評估 {} 個候選）",
                    self.sweeps,
                    applied,
                    evaluated
                );

                self.ledger.record(schedule, score);
                self.phase = Phase::Optimizing;

                StepOutcome::Improved {
                    iteration: self.sweeps,
                    applied,
                }
            }
            SweepOutcome::LocalOptimum { evaluated } => {
                self.phase = Phase::LocalOptimum;

                tracing::info!(
                    "達到局部最佳解：改善 {} 輪，總延遲 {}，makespan {}（最後一輪評估 {} 個候選）",
                    self.sweeps,
                    score.total_tardiness,
                    score.makespan,
                    evaluated
                );

                StepOutcome::LocalOptimum
            }
        }
    }
}
