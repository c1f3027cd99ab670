//! 排程評分器
//!
//! 將排程展開為每台機台的時間軸，並計算多目標評分。
//! 增量評分只重算呼叫端標記為「已變更」的機台，其餘直接沿用
//! 前一次的機台評分；結果必須與完整重算完全相同。

use sched_core::{
    MachineId, MachineScore, Order, OrderId, Problem, Schedule, Score, SwitchoverConfig, Time,
};

use crate::switchover::SwitchoverPolicy;
use crate::timeline::{MachineTimeline, Timeline, TimelineEntry};

/// 增量評分的基準
#[derive(Debug, Clone, Copy)]
pub struct ScoreBasis<'s> {
    /// 編輯前的評分
    pub previous: &'s Score,

    /// 本次編輯動到的機台（可以多列，不可少列）
    pub changed: &'s [MachineId],
}

impl<'s> ScoreBasis<'s> {
    pub fn new(previous: &'s Score, changed: &'s [MachineId]) -> Self {
        Self { previous, changed }
    }

    fn reusable(&self, idx: usize, machine: MachineId) -> Option<MachineScore> {
        if self.changed.contains(&machine) {
            return None;
        }

        // 機台評分依登錄順序排列，先試同一位置
        match self.previous.machine_scores.get(idx) {
            Some(score) if score.machine == machine => Some(*score),
            _ => self.previous.machine_score(machine).copied(),
        }
    }
}

/// 排程評分器
#[derive(Debug, Clone, Copy)]
pub struct ScheduleEvaluator<'p> {
    problem: &'p Problem,
    policy: SwitchoverPolicy,
}

impl<'p> ScheduleEvaluator<'p> {
    /// 創建新的評分器
    pub fn new(problem: &'p Problem, switchover: &SwitchoverConfig) -> Self {
        Self {
            problem,
            policy: SwitchoverPolicy::new(*switchover),
        }
    }

    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    pub fn policy(&self) -> &SwitchoverPolicy {
        &self.policy
    }

    /// 展開整個排程的時間軸
    pub fn expand(&self, schedule: &Schedule) -> Timeline {
        Timeline {
            machines: schedule
                .lanes()
                .map(|(machine, orders)| self.expand_machine(machine, orders))
                .collect(),
        }
    }

    /// 展開單台機台的時間軸
    pub fn expand_machine(&self, machine: MachineId, orders: &[OrderId]) -> MachineTimeline {
        let mut entries = Vec::with_capacity(orders.len() * 2);
        self.walk(machine, orders, |entry, _| entries.push(entry));
        MachineTimeline { machine, entries }
    }

    /// 完整評分（不重用任何機台結果）
    pub fn score(&self, schedule: &Schedule) -> Score {
        self.score_with(schedule, None)
    }

    /// 增量評分
    pub fn score_incremental(&self, schedule: &Schedule, basis: ScoreBasis<'_>) -> Score {
        self.score_with(schedule, Some(basis))
    }

    /// 評分；有基準時未變更的機台直接沿用
    pub fn score_with(&self, schedule: &Schedule, basis: Option<ScoreBasis<'_>>) -> Score {
        let machine_scores = schedule
            .lanes()
            .enumerate()
            .map(|(idx, (machine, orders))| {
                basis
                    .and_then(|b| b.reusable(idx, machine))
                    .unwrap_or_else(|| self.score_machine(machine, orders))
            })
            .collect();

        Score::from_machine_scores(machine_scores)
    }

    /// 重算單台機台的評分
    pub fn score_machine(&self, machine: MachineId, orders: &[OrderId]) -> MachineScore {
        let mut score = MachineScore::idle(machine);

        self.walk(machine, orders, |entry, order| match (entry, order) {
            (TimelineEntry::Order { end, .. }, Some(order)) => {
                score.tardiness += order.tardiness_at(end);
                score.completion = end;
            }
            (TimelineEntry::Switchover { costly, end, .. }, _) => {
                if costly {
                    score.costly_switchovers += 1;
                }
                score.completion = end;
            }
            _ => {}
        });

        score
    }

    /// 依序走訪機台上的訂單與換線，回呼每個時間軸項目
    ///
    /// # Panics
    /// 訂單被排在無法生產它的機台上（排程違反可生產性）
    fn walk<F>(&self, machine: MachineId, orders: &[OrderId], mut visit: F)
    where
        F: FnMut(TimelineEntry, Option<&Order>),
    {
        let machine_ref = self.problem.resolve_machine(machine);
        let mut end: Time = 0;
        let mut previous: Option<&Order> = None;

        for &order_id in orders {
            let order = self.problem.resolve_order(order_id);

            if let Some(prev) = previous {
                let switchover = self.policy.between_orders(self.problem, prev, order);
                end += switchover.duration;
                visit(
                    TimelineEntry::Switchover {
                        duration: switchover.duration,
                        end,
                        costly: switchover.costly,
                    },
                    None,
                );
            }

            let duration = match machine_ref.processing_time(order) {
                Some(duration) => duration,
                None => panic!("機台 {} 無法生產訂單 {}", machine, order_id),
            };
            end += duration;
            visit(
                TimelineEntry::Order {
                    order: order_id,
                    duration,
                    end,
                },
                Some(order),
            );

            previous = Some(order);
        }
    }
}
