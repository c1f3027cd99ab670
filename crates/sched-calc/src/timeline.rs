//! 排程時間軸（每次由排程重新推導，不儲存）

use sched_core::{MachineId, OrderId, Time};
use serde::{Deserialize, Serialize};

/// 時間軸項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    /// 生產訂單
    Order {
        order: OrderId,
        duration: Time,
        end: Time,
    },
    /// 換線
    Switchover {
        duration: Time,
        end: Time,
        costly: bool,
    },
}

impl TimelineEntry {
    /// 累計結束時間
    pub fn end(&self) -> Time {
        match *self {
            TimelineEntry::Order { end, .. } | TimelineEntry::Switchover { end, .. } => end,
        }
    }

    /// 訂單項目的訂單ID
    pub fn order(&self) -> Option<OrderId> {
        match *self {
            TimelineEntry::Order { order, .. } => Some(order),
            TimelineEntry::Switchover { .. } => None,
        }
    }

    pub fn is_costly_switchover(&self) -> bool {
        matches!(self, TimelineEntry::Switchover { costly: true, .. })
    }
}

/// 單台機台的時間軸
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineTimeline {
    pub machine: MachineId,
    pub entries: Vec<TimelineEntry>,
}

impl MachineTimeline {
    /// 機台完工時間（空機台為 0）
    pub fn completion(&self) -> Time {
        self.entries.last().map(TimelineEntry::end).unwrap_or(0)
    }

    /// 依序列出 (訂單, 完工時間)
    pub fn order_ends(&self) -> impl Iterator<Item = (OrderId, Time)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.order().map(|order| (order, entry.end())))
    }
}

/// 整個排程的時間軸（機台登錄順序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub machines: Vec<MachineTimeline>,
}

impl Timeline {
    pub fn machine(&self, machine: MachineId) -> Option<&MachineTimeline> {
        self.machines.iter().find(|t| t.machine == machine)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MachineTimeline> {
        self.machines.iter()
    }
}
