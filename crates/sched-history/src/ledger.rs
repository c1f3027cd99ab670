//! 快照紀錄（只可附加）

use sched_core::{Schedule, Score};
use serde::Serialize;

/// 一次提交的排程與評分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub schedule: Schedule,
    pub score: Score,
}

impl Snapshot {
    pub fn new(schedule: Schedule, score: Score) -> Self {
        Self { schedule, score }
    }
}

/// 快照紀錄
///
/// 建構與改善每提交一次就附加一筆；已附加的快照永不修改。
/// 索引 0 為初始的空排程。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotLedger {
    snapshots: Vec<Snapshot>,

    /// 最後一筆建構快照的索引（改善前標記）
    construction_end: Option<usize>,
}

impl SnapshotLedger {
    /// 創建空紀錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始快照創建紀錄
    pub fn with_initial(schedule: Schedule, score: Score) -> Self {
        let mut ledger = Self::new();
        ledger.record(schedule, score);
        ledger
    }

    /// 附加快照，返回其索引
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        self.snapshots.push(snapshot);
        self.snapshots.len() - 1
    }

    /// 附加 (排程, 評分)，返回其索引
    pub fn record(&mut self, schedule: Schedule, score: Score) -> usize {
        self.push(Snapshot::new(schedule, score))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// 最新快照（即目前排程）
    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// 將目前最後一筆標記為建構結束
    pub fn mark_construction_end(&mut self) {
        self.construction_end = self.snapshots.len().checked_sub(1);
    }

    /// 建構結束（改善前）的快照索引
    pub fn construction_end(&self) -> Option<usize> {
        self.construction_end
    }

    /// 快照屬於第幾輪改善（建構期間的快照為 None）
    pub fn optimization_iteration(&self, index: usize) -> Option<usize> {
        let end = self.construction_end?;
        if index > end && index < self.snapshots.len() {
            Some(index - end)
        } else {
            None
        }
    }

    /// 匯出為 JSON（供外部呈現）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a SnapshotLedger {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;
    use sched_core::{MachineId, OrderId};

    const M: MachineId = MachineId(1);

    /// 建構兩筆、改善一筆的紀錄
    pub(crate) fn sample_ledger() -> SnapshotLedger {
        let empty = Schedule::empty([M]);
        let mut ledger = SnapshotLedger::with_initial(empty.clone(), Score::zero([M]));

        let first = empty.push(OrderId(1), M);
        ledger.record(first.clone(), Score::zero([M]));
        let second = first.push(OrderId(2), M);
        ledger.record(second.clone(), Score::zero([M]));
        ledger.mark_construction_end();

        ledger.record(second.remove(M, 0).push(OrderId(1), M), Score::zero([M]));
        ledger
    }

    #[test]
    fn test_append_and_index() {
        let ledger = sample_ledger();

        assert_eq!(ledger.len(), 4);
        assert_eq!(ledger.get(0).unwrap().schedule.order_count(), 0);
        assert_eq!(ledger.get(2).unwrap().schedule.order_count(), 2);
        assert!(ledger.get(4).is_none());
        assert_eq!(
            ledger.last().unwrap().schedule.orders_on(M).unwrap(),
            &[OrderId(2), OrderId(1)]
        );
    }

    #[test]
    fn test_earlier_snapshots_remain_valid() {
        let ledger = sample_ledger();

        // 後續提交不影響先前的快照
        assert_eq!(
            ledger.get(1).unwrap().schedule.orders_on(M).unwrap(),
            &[OrderId(1)]
        );
    }

    #[rstest]
    #[case(0, None)]
    #[case(1, None)]
    #[case(2, None)]
    #[case(3, Some(1))]
    #[case(9, None)]
    fn test_optimization_iteration(#[case] index: usize, #[case] expected: Option<usize>) {
        let ledger = sample_ledger();

        assert_eq!(ledger.construction_end(), Some(2));
        assert_eq!(ledger.optimization_iteration(index), expected);
    }

    #[test]
    fn test_marker_on_empty_ledger() {
        let mut ledger = SnapshotLedger::new();
        ledger.mark_construction_end();

        assert!(ledger.is_empty());
        assert_eq!(ledger.construction_end(), None);
    }

    #[test]
    fn test_json_export() {
        let ledger = sample_ledger();
        let json = ledger.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let snapshots = value["snapshots"].as_array().unwrap();
        assert_eq!(snapshots.len(), ledger.len());
        assert_eq!(value["construction_end"], serde_json::json!(2));
        assert_eq!(
            snapshots[2]["schedule"]["lanes"][0]["orders"],
            serde_json::json!([1, 2])
        );
        assert_eq!(
            snapshots[3]["schedule"]["lanes"][0]["orders"],
            serde_json::json!([2, 1])
        );
    }
}
