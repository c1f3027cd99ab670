//! 排程與變更原語
//!
//! 排程是「機台 → 訂單順序」的不可變值。每台機台的序列以 `Arc`
//! 共享，插入或移除時只複製受影響的那台機台，其餘序列以指標共享。

use serde::Serialize;
use std::sync::Arc;

use crate::{MachineId, OrderId};

/// 單台機台的訂單序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Lane {
    machine: MachineId,
    orders: Arc<Vec<OrderId>>,
}

/// 排程
///
/// 不變量：每張訂單恰好出現在一台機台的序列中一次。
/// 只能經由 [`Schedule::insert`] / [`Schedule::remove`] 產生新值，
/// 因此只提供序列化匯出，不從外部資料載入。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    lanes: Vec<Lane>,
}

impl Schedule {
    /// 創建空排程（每台機台都沒有訂單）
    pub fn empty(machines: impl IntoIterator<Item = MachineId>) -> Self {
        Self {
            lanes: machines
                .into_iter()
                .map(|machine| Lane {
                    machine,
                    orders: Arc::new(Vec::new()),
                })
                .collect(),
        }
    }

    /// 機台數量
    pub fn machine_count(&self) -> usize {
        self.lanes.len()
    }

    /// 已排入的訂單總數
    pub fn order_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.orders.len()).sum()
    }

    /// 依登錄順序列出 (機台, 訂單序列)
    pub fn lanes(&self) -> impl Iterator<Item = (MachineId, &[OrderId])> + '_ {
        self.lanes
            .iter()
            .map(|lane| (lane.machine, lane.orders.as_slice()))
    }

    /// 機台ID（登錄順序）
    pub fn machines(&self) -> impl Iterator<Item = MachineId> + '_ {
        self.lanes.iter().map(|lane| lane.machine)
    }

    /// 機台的訂單序列
    pub fn orders_on(&self, machine: MachineId) -> Option<&[OrderId]> {
        self.lane_index(machine)
            .map(|idx| self.lanes[idx].orders.as_slice())
    }

    /// 找出訂單所在的 (機台, 位置)
    pub fn locate(&self, order: OrderId) -> Option<(MachineId, usize)> {
        self.lanes.iter().find_map(|lane| {
            lane.orders
                .iter()
                .position(|&o| o == order)
                .map(|pos| (lane.machine, pos))
        })
    }

    /// 檢查兩個排程是否共用同一台機台的序列（未被複製）
    pub fn shares_lane(&self, other: &Schedule, machine: MachineId) -> bool {
        match (self.lane_index(machine), other.lane_index(machine)) {
            (Some(a), Some(b)) => Arc::ptr_eq(&self.lanes[a].orders, &other.lanes[b].orders),
            _ => false,
        }
    }

    /// 在機台序列的 `position` 插入訂單，返回新排程
    ///
    /// # Panics
    /// 機台不在排程中，或 `position` 超出 `[0, len]`
    pub fn insert(&self, order: OrderId, machine: MachineId, position: usize) -> Schedule {
        let idx = self.require_lane(machine);
        let current = &self.lanes[idx].orders;
        assert!(
            position <= current.len(),
            "插入位置 {} 超出機台 {} 的範圍 [0, {}]",
            position,
            machine,
            current.len()
        );

        let mut orders = Vec::with_capacity(current.len() + 1);
        orders.extend_from_slice(&current[..position]);
        orders.push(order);
        orders.extend_from_slice(&current[position..]);

        self.with_lane(idx, orders)
    }

    /// 將訂單接到機台序列的末端
    ///
    /// # Panics
    /// 機台不在排程中
    pub fn push(&self, order: OrderId, machine: MachineId) -> Schedule {
        let len = self.lanes[self.require_lane(machine)].orders.len();
        self.insert(order, machine, len)
    }

    /// 移除機台序列 `position` 上的訂單，返回新排程
    ///
    /// # Panics
    /// 機台不在排程中，或 `position` 超出 `[0, len - 1]`
    pub fn remove(&self, machine: MachineId, position: usize) -> Schedule {
        let idx = self.require_lane(machine);
        let current = &self.lanes[idx].orders;
        assert!(
            position < current.len(),
            "移除位置 {} 超出機台 {} 的範圍（共 {} 筆）",
            position,
            machine,
            current.len()
        );

        let mut orders = Vec::with_capacity(current.len() - 1);
        orders.extend_from_slice(&current[..position]);
        orders.extend_from_slice(&current[position + 1..]);

        self.with_lane(idx, orders)
    }

    fn lane_index(&self, machine: MachineId) -> Option<usize> {
        self.lanes.iter().position(|lane| lane.machine == machine)
    }

    fn require_lane(&self, machine: MachineId) -> usize {
        match self.lane_index(machine) {
            Some(idx) => idx,
            None => panic!("機台 {} 不在排程中", machine),
        }
    }

    /// 只替換一台機台的序列；其他序列共用原本的 `Arc`
    fn with_lane(&self, idx: usize, orders: Vec<OrderId>) -> Schedule {
        let mut lanes = self.lanes.clone();
        lanes[idx].orders = Arc::new(orders);
        Schedule { lanes }
    }
}
