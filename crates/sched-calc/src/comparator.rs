//! 評分比較
//!
//! 嚴格字典序，依序比較：總延遲 → makespan → 高成本換線數 →
//! makespan 機台數；只有前一層平手才看下一層，四層全平手不算改善。

use sched_core::Score;
use std::cmp::Ordering;

/// `candidate` 是否嚴格優於 `current`
pub fn improves(current: &Score, candidate: &Score) -> bool {
    candidate.objective() < current.objective()
}

/// 依目標字典序比較（`Less` 表示 `a` 較佳）
pub fn compare(a: &Score, b: &Score) -> Ordering {
    a.objective().cmp(&b.objective())
}
