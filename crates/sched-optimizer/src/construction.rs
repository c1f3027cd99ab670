//! 建構式啟發法
//!
//! 先排可用機台最少的訂單（稀缺優先），同數量時交期早者優先；
//! 每張訂單逐一嘗試所有可用機台的所有插入位置，取評分最佳者。

use sched_calc::{improves, ScheduleEvaluator, ScoreBasis};
use sched_core::{
    EngineConfig, InfeasibleOrder, MachineId, Order, OrderId, Problem, Result, Schedule, Score,
};
use sched_history::SnapshotLedger;

/// 一次插入的結果
#[derive(Debug, Clone)]
pub struct Insertion {
    pub schedule: Schedule,
    pub score: Score,
    pub machine: MachineId,
    pub position: usize,
}

/// 建構結果
#[derive(Debug, Clone)]
pub struct Construction {
    /// 建構完成的排程
    pub schedule: Schedule,

    /// 排程評分
    pub score: Score,

    /// 快照紀錄（初始空排程 + 每次插入一筆）
    pub ledger: SnapshotLedger,

    /// 無可用機台、未排入的訂單
    pub infeasible: Vec<InfeasibleOrder>,
}

impl Construction {
    /// 是否所有訂單都已排入
    pub fn is_complete(&self) -> bool {
        self.infeasible.is_empty()
    }

    /// 要求所有訂單都已排入；否則以第一張未排入的訂單回報錯誤
    pub fn ensure_complete(&self) -> Result<()> {
        match self.infeasible.first() {
            Some(&item) => Err(item.into()),
            None => Ok(()),
        }
    }
}

/// 計算建構順序
///
/// 依 (可用機台數, 交期) 穩定排序；無可用機台的訂單另行回報。
pub fn construction_sequence(problem: &Problem) -> (Vec<OrderId>, Vec<InfeasibleOrder>) {
    let infeasible = problem.infeasible_orders();

    let mut sequence: Vec<&Order> = problem
        .orders()
        .iter()
        .filter(|o| !problem.eligible_machines(o.product).is_empty())
        .collect();

    sequence.sort_by_key(|o| (problem.eligible_machines(o.product).len(), o.due));

    (sequence.into_iter().map(|o| o.id).collect(), infeasible)
}

/// 找出訂單的最佳插入位置
///
/// 列舉順序為機台登錄順序、位置由小到大；平手時保留先列舉到的位置。
/// 訂單沒有可用機台時返回 None。
pub fn best_insertion(
    evaluator: &ScheduleEvaluator<'_>,
    schedule: &Schedule,
    score: &Score,
    order: &Order,
) -> Option<Insertion> {
    let problem = evaluator.problem();
    let mut best: Option<Insertion> = None;

    for &machine in problem.eligible_machines(order.product) {
        let len = schedule.orders_on(machine).map_or(0, <[OrderId]>::len);

        for position in 0..=len {
            let candidate = schedule.insert(order.id, machine, position);
            let changed = [machine];
            let candidate_score =
                evaluator.score_incremental(&candidate, ScoreBasis::new(score, &changed));

            let better = match &best {
                None => true,
                Some(current) => improves(&current.score, &candidate_score),
            };

            if better {
                best = Some(Insertion {
                    schedule: candidate,
                    score: candidate_score,
                    machine,
                    position,
                });
            }
        }
    }

    best
}

/// 執行完整建構
///
/// # Panics
/// 換線參數使最壞完工時間超出時間範圍時（見 [`Problem::check_horizon`]）
pub fn construct(problem: &Problem, config: &EngineConfig) -> Construction {
    if let Err(err) = problem.check_horizon(&config.switchover) {
        panic!("{}", err);
    }

    let evaluator = ScheduleEvaluator::new(problem, &config.switchover);
    let (sequence, infeasible) = construction_sequence(problem);

    tracing::info!(
        "開始建構排程：訂單 {} 筆，機台 {} 台，無可用機台 {} 筆",
        problem.orders().len(),
        problem.machines().len(),
        infeasible.len()
    );
    for item in &infeasible {
        tracing::warn!("{}", item);
    }

    let mut schedule = problem.empty_schedule();
    let mut score = evaluator.score(&schedule);
    let mut ledger = SnapshotLedger::with_initial(schedule.clone(), score.clone());

    for order_id in sequence {
        let order = problem.resolve_order(order_id);

        // construction_sequence 已排除無可用機台的訂單
        let Some(insertion) = best_insertion(&evaluator, &schedule, &score, order) else {
            continue;
        };

        tracing::debug!(
            "插入訂單 {} → 機台 {} 位置 {}",
            order_id,
            insertion.machine,
            insertion.position
        );

        schedule = insertion.schedule;
        score = evaluator.score(&schedule);
        ledger.record(schedule.clone(), score.clone());
    }

    ledger.mark_construction_end();

    tracing::info!(
        "建構完成：總延遲 {}，makespan {}，高成本換線 {}",
        score.total_tardiness,
        score.makespan,
        score.costly_switchovers
    );

    Construction {
        schedule,
        score,
        ledger,
        infeasible,
    }
}
