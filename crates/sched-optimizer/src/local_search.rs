//! 局部搜尋
//!
//! 每一輪（sweep）列舉所有相關訂單的所有移動，取全域最佳且嚴格優於
//! 目前排程的候選；沒有任何改善時即為局部最佳解。

use rayon::prelude::*;

use sched_calc::{improves, ScheduleEvaluator};
use sched_core::{EngineConfig, OptimizerConfig, Problem, Schedule, Score};

use crate::neighborhood::{Candidate, Move, Neighborhood, Slot, SlotSearch};
use crate::relevance::relevant_orders;

/// 一輪搜尋的結果
#[derive(Debug, Clone)]
pub enum SweepOutcome {
    /// 找到改善
    Improved {
        schedule: Schedule,
        score: Score,
        applied: Move,
        evaluated: usize,
    },
    /// 已是局部最佳解
    LocalOptimum { evaluated: usize },
}

impl SweepOutcome {
    pub fn is_improved(&self) -> bool {
        matches!(self, SweepOutcome::Improved { .. })
    }

    /// 評估過的候選數
    pub fn evaluated(&self) -> usize {
        match self {
            SweepOutcome::Improved { evaluated, .. } | SweepOutcome::LocalOptimum { evaluated } => {
                *evaluated
            }
        }
    }
}

/// 局部搜尋器
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch<'p> {
    evaluator: ScheduleEvaluator<'p>,
    config: OptimizerConfig,
}

impl<'p> LocalSearch<'p> {
    pub fn new(problem: &'p Problem, config: &EngineConfig) -> Self {
        Self {
            evaluator: ScheduleEvaluator::new(problem, &config.switchover),
            config: config.optimizer,
        }
    }

    pub fn evaluator(&self) -> &ScheduleEvaluator<'p> {
        &self.evaluator
    }

    /// 列出要嘗試移動的訂單位置（機台順序 × 產線順序）
    pub fn relevant_slots(&self, schedule: &Schedule, score: &Score) -> Vec<Slot> {
        let timeline = self.evaluator.expand(schedule);
        let relevant = relevant_orders(self.evaluator.problem(), &timeline, score);

        schedule
            .lanes()
            .flat_map(|(machine, orders)| {
                orders
                    .iter()
                    .enumerate()
                    .map(move |(position, &order)| Slot::new(machine, position, order))
            })
            .filter(|slot| relevant.contains(&slot.order))
            .collect()
    }

    /// 執行一輪搜尋
    ///
    /// 平行模式下各訂單獨立搜尋，再依列舉順序合併，
    /// 結果與循序模式完全相同。
    pub fn sweep(&self, schedule: &Schedule, score: &Score) -> SweepOutcome {
        let slots = self.relevant_slots(schedule, score);
        let neighborhood = Neighborhood::new(self.evaluator, &self.config);

        let searches: Vec<SlotSearch> = if self.config.parallel_sweep {
            slots
                .par_iter()
                .map(|&slot| neighborhood.best_move(schedule, score, slot))
                .collect()
        } else {
            slots
                .iter()
                .map(|&slot| neighborhood.best_move(schedule, score, slot))
                .collect()
        };

        let evaluated = searches.iter().map(|s| s.evaluated).sum();
        let mut best: Option<Candidate> = None;

        for candidate in searches.into_iter().filter_map(|s| s.best) {
            let reference = best.as_ref().map_or(score, |b| &b.score);
            if improves(reference, &candidate.score) {
                best = Some(candidate);
            }
        }

        tracing::debug!(
            "相關訂單 {} 筆，評估候選 {} 個",
            slots.len(),
            evaluated
        );

        match best {
            Some(candidate) => {
                let committed = self.evaluator.score(&candidate.schedule);
                debug_assert_eq!(committed, candidate.score, "增量評分與完整重算不一致");

                SweepOutcome::Improved {
                    schedule: candidate.schedule,
                    score: committed,
                    applied: candidate.applied,
                    evaluated,
                }
            }
            None => SweepOutcome::LocalOptimum { evaluated },
        }
    }
}

/// 執行一輪局部搜尋
///
/// 返回改善後的排程與評分；已是局部最佳解時返回 None。
pub fn optimize_step(
    problem: &Problem,
    config: &EngineConfig,
    schedule: &Schedule,
    score: &Score,
) -> Option<(Schedule, Score)> {
    match LocalSearch::new(problem, config).sweep(schedule, score) {
        SweepOutcome::Improved {
            schedule, score, ..
        } => Some((schedule, score)),
        SweepOutcome::LocalOptimum { .. } => None,
    }
}
