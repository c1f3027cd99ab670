//! 快照瀏覽游標
//!
//! 游標由呼叫端持有，引擎本身不讀取也不移動它。

use crate::ledger::{Snapshot, SnapshotLedger};

/// 快照瀏覽游標
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryCursor {
    index: usize,
}

impl HistoryCursor {
    /// 創建指向第一筆快照的游標
    pub fn new() -> Self {
        Self::default()
    }

    /// 創建指向最新快照的游標
    pub fn at_last(ledger: &SnapshotLedger) -> Self {
        let mut cursor = Self::new();
        cursor.last(ledger);
        cursor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 目前指向的快照
    pub fn current<'l>(&self, ledger: &'l SnapshotLedger) -> Option<&'l Snapshot> {
        ledger.get(self.index)
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self, ledger: &SnapshotLedger) -> bool {
        self.index + 1 < ledger.len()
    }

    /// 跳到第一筆
    pub fn first(&mut self) {
        self.index = 0;
    }

    /// 上一筆；已在第一筆時不動並返回 false
    pub fn previous(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// 下一筆；已在最後一筆時不動並返回 false
    pub fn next(&mut self, ledger: &SnapshotLedger) -> bool {
        if self.can_go_forward(ledger) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// 跳到最後一筆
    pub fn last(&mut self, ledger: &SnapshotLedger) {
        self.index = ledger.len().saturating_sub(1);
    }

    /// 跳到建構結束（改善前）的快照；尚未標記時不動
    pub fn pre_optimization(&mut self, ledger: &SnapshotLedger) -> bool {
        match ledger.construction_end() {
            Some(end) => {
                self.index = end;
                true
            }
            None => false,
        }
    }

    /// 游標是否停在改善前標記上
    pub fn is_at_pre_optimization(&self, ledger: &SnapshotLedger) -> bool {
        ledger.construction_end() == Some(self.index)
    }
}
