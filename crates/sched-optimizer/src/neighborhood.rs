//! 鄰域移動：搬移（relocate）與交換（swap）
//!
//! 對單一相關訂單列舉所有移動，保留該訂單的最佳候選。
//! 列舉順序固定：先搬移（可用機台登錄順序 × 位置由小到大），
//! 再交換（排程中機台順序 × 產線順序）；平手時保留先列舉者。

use std::fmt;

use serde::{Deserialize, Serialize};

use sched_calc::{improves, ScheduleEvaluator, ScoreBasis};
use sched_core::{MachineId, OptimizerConfig, OrderId, Schedule, Score};

/// 訂單在排程中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub machine: MachineId,
    pub position: usize,
    pub order: OrderId,
}

impl Slot {
    pub fn new(machine: MachineId, position: usize, order: OrderId) -> Self {
        Self {
            machine,
            position,
            order,
        }
    }
}

/// 已套用的移動
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// 將訂單移到另一個位置（`to` 的位置以移除後的產線計算）
    Relocate {
        from: Slot,
        to: MachineId,
        position: usize,
    },
    /// 交換兩張訂單的位置
    Swap { first: Slot, second: Slot },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Relocate { from, to, position } => write!(
                f,
                "搬移 {}：{}[{}] → {}[{}]",
                from.order, from.machine, from.position, to, position
            ),
            Move::Swap { first, second } => write!(
                f,
                "交換 {}（{}[{}]）與 {}（{}[{}]）",
                first.order,
                first.machine,
                first.position,
                second.order,
                second.machine,
                second.position
            ),
        }
    }
}

/// 搬移：移除 `from` 後插入到 `to` 的 `position`
pub fn relocate(schedule: &Schedule, from: Slot, to: MachineId, position: usize) -> Schedule {
    schedule
        .remove(from.machine, from.position)
        .insert(from.order, to, position)
}

/// 交換兩張訂單
///
/// 先移除位置較後者再移除較前者，然後放回對方原本的位置，
/// 同一產線上的交換也不會錯位。
pub fn swap(schedule: &Schedule, a: Slot, b: Slot) -> Schedule {
    if a.position < b.position {
        schedule
            .remove(b.machine, b.position)
            .remove(a.machine, a.position)
            .insert(b.order, a.machine, a.position)
            .insert(a.order, b.machine, b.position)
    } else {
        schedule
            .remove(a.machine, a.position)
            .remove(b.machine, b.position)
            .insert(a.order, b.machine, b.position)
            .insert(b.order, a.machine, a.position)
    }
}

/// 候選排程
#[derive(Debug, Clone)]
pub struct Candidate {
    pub schedule: Schedule,
    pub score: Score,
    pub applied: Move,
}

/// 單一訂單的搜尋結果
#[derive(Debug, Clone, Default)]
pub struct SlotSearch {
    /// 最佳候選（未與目前排程比較）
    pub best: Option<Candidate>,

    /// 評估過的候選數
    pub evaluated: usize,
}

impl SlotSearch {
    fn offer(&mut self, candidate: Candidate) {
        self.evaluated += 1;

        let better = match &self.best {
            None => true,
            Some(best) => improves(&best.score, &candidate.score),
        };
        if better {
            self.best = Some(candidate);
        }
    }
}

/// 鄰域搜尋器
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'p> {
    evaluator: ScheduleEvaluator<'p>,
    relocate: bool,
    swap: bool,
}

impl<'p> Neighborhood<'p> {
    pub fn new(evaluator: ScheduleEvaluator<'p>, config: &OptimizerConfig) -> Self {
        Self {
            evaluator,
            relocate: config.relocate,
            swap: config.swap,
        }
    }

    /// 列舉 `slot` 上訂單的所有移動，取最佳候選
    pub fn best_move(&self, schedule: &Schedule, score: &Score, slot: Slot) -> SlotSearch {
        let mut search = SlotSearch::default();

        if self.relocate {
            self.relocations(schedule, score, slot, &mut search);
        }
        if self.swap {
            self.swaps(schedule, score, slot, &mut search);
        }

        search
    }

    fn relocations(&self, schedule: &Schedule, score: &Score, slot: Slot, search: &mut SlotSearch) {
        let problem = self.evaluator.problem();
        let order = problem.resolve_order(slot.order);

        let without = schedule.remove(slot.machine, slot.position);
        let removed_from = [slot.machine];
        let without_score = self
            .evaluator
            .score_incremental(&without, ScoreBasis::new(score, &removed_from));

        for &machine in problem.eligible_machines(order.product) {
            let len = without.orders_on(machine).map_or(0, <[OrderId]>::len);

            for position in 0..=len {
                // 放回原位等於沒有移動
                if machine == slot.machine && position == slot.position {
                    continue;
                }

                let candidate = without.insert(slot.order, machine, position);
                let changed = [machine];
                let candidate_score = self
                    .evaluator
                    .score_incremental(&candidate, ScoreBasis::new(&without_score, &changed));

                search.offer(Candidate {
                    schedule: candidate,
                    score: candidate_score,
                    applied: Move::Relocate {
                        from: slot,
                        to: machine,
                        position,
                    },
                });
            }
        }
    }

    fn swaps(&self, schedule: &Schedule, score: &Score, slot: Slot, search: &mut SlotSearch) {
        let problem = self.evaluator.problem();

        for (machine, orders) in schedule.lanes() {
            for (position, &order) in orders.iter().enumerate() {
                if order == slot.order
                    || !problem.is_eligible(machine, slot.order)
                    || !problem.is_eligible(slot.machine, order)
                {
                    continue;
                }

                let other = Slot::new(machine, position, order);
                let candidate = swap(schedule, slot, other);
                let changed = [slot.machine, machine];
                let candidate_score = self
                    .evaluator
                    .score_incremental(&candidate, ScoreBasis::new(score, &changed));

                search.offer(Candidate {
                    schedule: candidate,
                    score: candidate_score,
                    applied: Move::Swap {
                        first: slot,
                        second: other,
                    },
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{plant, A, B, DARK, MILK_NUTS, WHITE};
    use rstest::rstest;
    use sched_core::{Order, SwitchoverConfig};

    fn three_on_a() -> Schedule {
        Schedule::empty([A, B])
            .push(OrderId(1), A)
            .push(OrderId(2), A)
            .push(OrderId(3), A)
            .push(OrderId(4), B)
    }

    #[rstest]
    #[case(0, 2, &[3, 2, 1])]
    #[case(2, 0, &[3, 2, 1])]
    #[case(0, 1, &[2, 1, 3])]
    #[case(1, 2, &[1, 3, 2])]
    fn test_swap_within_lane(#[case] i: usize, #[case] j: usize, #[case] expected: &[u32]) {
        let schedule = three_on_a();
        let lane = schedule.orders_on(A).unwrap();
        let a = Slot::new(A, i, lane[i]);
        let b = Slot::new(A, j, lane[j]);

        let swapped = swap(&schedule, a, b);

        let ids: Vec<u32> = swapped.orders_on(A).unwrap().iter().map(|o| o.0).collect();
        assert_eq!(ids, expected);
        assert!(swapped.shares_lane(&schedule, B));
    }

    #[test]
    fn test_swap_across_lanes() {
        let schedule = three_on_a();

        let swapped = swap(
            &schedule,
            Slot::new(A, 1, OrderId(2)),
            Slot::new(B, 0, OrderId(4)),
        );

        assert_eq!(
            swapped.orders_on(A).unwrap(),
            &[OrderId(1), OrderId(4), OrderId(3)]
        );
        assert_eq!(swapped.orders_on(B).unwrap(), &[OrderId(2)]);
    }

    #[test]
    fn test_relocate() {
        let schedule = three_on_a();

        let moved = relocate(&schedule, Slot::new(A, 0, OrderId(1)), B, 1);

        assert_eq!(moved.orders_on(A).unwrap(), &[OrderId(2), OrderId(3)]);
        assert_eq!(moved.orders_on(B).unwrap(), &[OrderId(4), OrderId(1)]);
        // 原排程不變
        assert_eq!(schedule.orders_on(A).unwrap().len(), 3);
    }

    #[test]
    fn test_move_display() {
        let relocate = Move::Relocate {
            from: Slot::new(A, 0, OrderId(1)),
            to: B,
            position: 2,
        };

        assert_eq!(relocate.to_string(), "搬移 O1：M1[0] → M2[2]");
    }

    #[test]
    fn test_best_move_scores_match_full_rescore() {
        let orders = vec![
            Order::new(OrderId(1), DARK, 3, 10),
            Order::new(OrderId(2), WHITE, 2, 5),
            Order::new(OrderId(3), DARK, 4, 40),
            Order::new(OrderId(4), MILK_NUTS, 2, 20),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let neighborhood = Neighborhood::new(evaluator, &OptimizerConfig::default());
        let schedule = three_on_a();
        let score = evaluator.score(&schedule);

        let search = neighborhood.best_move(&schedule, &score, Slot::new(A, 2, OrderId(3)));
        let best = search.best.unwrap();

        assert_eq!(best.score, evaluator.score(&best.schedule));
        // 搬移：移除後 A 剩 2 張、B 1 張 → 3 + 2 個位置，扣掉原位 1 個；
        // 交換：O1、O2（A 上）與 O4（B 無法生產於 A）→ 只有 2 個
        assert_eq!(search.evaluated, 4 + 2);
    }

    #[test]
    fn test_swap_requires_mutual_eligibility() {
        let orders = vec![
            Order::new(OrderId(1), DARK, 1, 100),
            Order::new(OrderId(2), MILK_NUTS, 1, 100),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let neighborhood =
            Neighborhood::new(evaluator, &OptimizerConfig::default().with_moves(false, true));
        let schedule = Schedule::empty([A, B])
            .push(OrderId(1), A)
            .push(OrderId(2), B);
        let score = evaluator.score(&schedule);

        // 含堅果產品不能到 A
        let search = neighborhood.best_move(&schedule, &score, Slot::new(A, 0, OrderId(1)));

        assert_eq!(search.evaluated, 0);
        assert!(search.best.is_none());
    }

    #[test]
    fn test_disabled_moves_are_skipped() {
        let orders = vec![
            Order::new(OrderId(1), DARK, 1, 100),
            Order::new(OrderId(2), DARK, 1, 100),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let schedule = Schedule::empty([A, B])
            .push(OrderId(1), A)
            .push(OrderId(2), A);
        let score = evaluator.score(&schedule);
        let slot = Slot::new(A, 0, OrderId(1));

        let relocate_only =
            Neighborhood::new(evaluator, &OptimizerConfig::default().with_moves(true, false));
        let search = relocate_only.best_move(&schedule, &score, slot);
        // A 剩 1 張 → 2 個位置扣原位；B 空 → 1 個位置
        assert_eq!(search.evaluated, 2);
        assert!(matches!(
            search.best.unwrap().applied,
            Move::Relocate { .. }
        ));

        let swap_only =
            Neighborhood::new(evaluator, &OptimizerConfig::default().with_moves(false, true));
        let search = swap_only.best_move(&schedule, &score, slot);
        assert_eq!(search.evaluated, 1);
        assert!(matches!(search.best.unwrap().applied, Move::Swap { .. }));
    }
}
