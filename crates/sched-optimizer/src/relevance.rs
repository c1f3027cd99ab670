//! 相關訂單篩選
//!
//! 局部搜尋只移動可能改善目標的訂單：
//! - 完工時間等於 makespan 的機台上所有訂單
//! - 機台上最後一張延遲訂單及其之前的所有訂單
//! - 高成本換線前後的兩張訂單

use std::collections::HashSet;

use sched_calc::{Timeline, TimelineEntry};
use sched_core::{OrderId, Problem, Score};

/// 計算相關訂單集合
pub fn relevant_orders(problem: &Problem, timeline: &Timeline, score: &Score) -> HashSet<OrderId> {
    let mut relevant = HashSet::new();

    for machine in timeline.iter() {
        let entries = &machine.entries;
        if entries.is_empty() {
            continue;
        }

        // 決定 makespan 的機台：整條產線都相關
        if machine.completion() == score.makespan {
            relevant.extend(machine.order_ends().map(|(order, _)| order));
            continue;
        }

        // 由後往前：遇到第一張延遲訂單後，之前的訂單全部相關
        let mut overdue_seen = false;
        for (idx, entry) in entries.iter().enumerate().rev() {
            match *entry {
                TimelineEntry::Order { order, end, .. } => {
                    if overdue_seen {
                        relevant.insert(order);
                    } else if problem.resolve_order(order).is_overdue_at(end) {
                        relevant.insert(order);
                        overdue_seen = true;
                    }
                }
                TimelineEntry::Switchover { costly: true, .. } => {
                    // 換線項目必定夾在兩張訂單之間
                    let before = idx.checked_sub(1).and_then(|i| entries.get(i));
                    relevant.extend(before.and_then(TimelineEntry::order));
                    relevant.extend(entries.get(idx + 1).and_then(TimelineEntry::order));
                }
                TimelineEntry::Switchover { .. } => {}
            }
        }
    }

    relevant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{plant, A, B, DARK, MILK_NUTS, WHITE};
    use sched_calc::ScheduleEvaluator;
    use sched_core::{Order, SwitchoverConfig};

    fn ids(set: &HashSet<OrderId>) -> Vec<u32> {
        let mut ids: Vec<u32> = set.iter().map(|o| o.0).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_makespan_machine_is_fully_relevant() {
        let orders = vec![
            Order::new(OrderId(1), DARK, 10, 1000),
            Order::new(OrderId(2), DARK, 10, 1000),
            Order::new(OrderId(3), DARK, 1, 1000),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let schedule = problem
            .empty_schedule()
            .push(OrderId(1), A)
            .push(OrderId(2), A)
            .push(OrderId(3), B);
        let score = evaluator.score(&schedule);

        let relevant = relevant_orders(&problem, &evaluator.expand(&schedule), &score);

        // B 未達 makespan、無延遲、無高成本換線
        assert_eq!(ids(&relevant), vec![1, 2]);
    }

    #[test]
    fn test_orders_up_to_last_overdue_are_relevant() {
        let orders = vec![
            Order::new(OrderId(1), DARK, 1, 1000),
            Order::new(OrderId(2), DARK, 1, 1),
            Order::new(OrderId(3), DARK, 1, 1000),
            // A 的 makespan 機台
            Order::new(OrderId(4), DARK, 20, 1000),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let schedule = problem
            .empty_schedule()
            .push(OrderId(4), A)
            .push(OrderId(1), B)
            .push(OrderId(2), B)
            .push(OrderId(3), B);
        let score = evaluator.score(&schedule);
        assert!(score.makespan > evaluator.expand(&schedule).machine(B).unwrap().completion());

        let relevant = relevant_orders(&problem, &evaluator.expand(&schedule), &score);

        // O2 延遲，O1 在其之前；O3 在最後延遲訂單之後
        assert_eq!(ids(&relevant), vec![1, 2, 4]);
    }

    #[test]
    fn test_costly_switchover_neighbours_are_relevant() {
        let orders = vec![
            Order::new(OrderId(1), MILK_NUTS, 1, 1000),
            Order::new(OrderId(2), WHITE, 1, 1000),
            Order::new(OrderId(3), DARK, 1, 1000),
            Order::new(OrderId(4), DARK, 40, 1000),
        ];
        let problem = plant(orders);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        // B：含堅果 → 白（高成本）→ 黑（一般）
        let schedule = problem
            .empty_schedule()
            .push(OrderId(4), A)
            .push(OrderId(1), B)
            .push(OrderId(2), B)
            .push(OrderId(3), B);
        let score = evaluator.score(&schedule);

        let relevant = relevant_orders(&problem, &evaluator.expand(&schedule), &score);

        assert_eq!(ids(&relevant), vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_schedule_has_no_relevant_orders() {
        let problem = plant(vec![]);
        let evaluator = ScheduleEvaluator::new(&problem, &SwitchoverConfig::default());
        let schedule = problem.empty_schedule();
        let score = evaluator.score(&schedule);

        assert!(relevant_orders(&problem, &evaluator.expand(&schedule), &score).is_empty());
    }
}
