//! 排程評分模型

use serde::{Deserialize, Serialize};

use crate::{MachineId, Time};

/// 單台機台的評分（供增量重用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineScore {
    /// 機台ID
    pub machine: MachineId,

    /// 機台上所有訂單的延遲總和
    pub tardiness: Time,

    /// 高成本換線次數
    pub costly_switchovers: u32,

    /// 機台完工時間
    pub completion: Time,
}

impl MachineScore {
    /// 空機台的評分
    pub fn idle(machine: MachineId) -> Self {
        Self {
            machine,
            tardiness: 0,
            costly_switchovers: 0,
            completion: 0,
        }
    }
}

/// 排程評分（多目標）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    /// 總延遲
    pub total_tardiness: Time,

    /// 高成本換線總數
    pub costly_switchovers: u32,

    /// 總完工時間（所有機台完工時間的最大值）
    pub makespan: Time,

    /// 完工時間等於 makespan 的機台數
    pub machines_at_makespan: u32,

    /// 各機台評分（機台登錄順序）
    pub machine_scores: Vec<MachineScore>,
}

impl Score {
    /// 由各機台評分彙總
    ///
    /// makespan 為零（沒有任何訂單）時，`machines_at_makespan` 也為零。
    pub fn from_machine_scores(machine_scores: Vec<MachineScore>) -> Self {
        let total_tardiness = machine_scores.iter().map(|m| m.tardiness).sum();
        let costly_switchovers = machine_scores.iter().map(|m| m.costly_switchovers).sum();
        let makespan = machine_scores
            .iter()
            .map(|m| m.completion)
            .max()
            .unwrap_or(0);

        let machines_at_makespan = if makespan == 0 {
            0
        } else {
            machine_scores
                .iter()
                .filter(|m| m.completion == makespan)
                .count() as u32
        };

        Self {
            total_tardiness,
            costly_switchovers,
            makespan,
            machines_at_makespan,
            machine_scores,
        }
    }

    /// 全部機台皆空的評分
    pub fn zero(machines: impl IntoIterator<Item = MachineId>) -> Self {
        Self::from_machine_scores(machines.into_iter().map(MachineScore::idle).collect())
    }

    /// 查詢機台評分
    pub fn machine_score(&self, machine: MachineId) -> Option<&MachineScore> {
        self.machine_scores.iter().find(|m| m.machine == machine)
    }

    /// 字典序目標值：(總延遲, makespan, 高成本換線, makespan 機台數)，越小越好
    pub fn objective(&self) -> (Time, Time, u32, u32) {
        (
            self.total_tardiness,
            self.makespan,
            self.costly_switchovers,
            self.machines_at_makespan,
        )
    }
}
