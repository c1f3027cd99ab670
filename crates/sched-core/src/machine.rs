//! 機台模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Order, ProductId, Time};

/// 機台ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub u32);

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// 機台
///
/// `time_per_unit` 中沒有的產品代表此機台無法生產該產品。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// 機台ID
    pub id: MachineId,

    /// 機台名稱
    pub name: String,

    /// 產品 → 單位加工時間
    pub time_per_unit: BTreeMap<ProductId, Time>,
}

impl Machine {
    /// 創建沒有任何產能的機台
    pub fn new(id: MachineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            time_per_unit: BTreeMap::new(),
        }
    }

    /// 建構器模式：設置某產品的單位加工時間
    pub fn with_capability(mut self, product: ProductId, time_per_unit: Time) -> Self {
        self.time_per_unit.insert(product, time_per_unit);
        self
    }

    /// 檢查機台是否能生產該產品
    pub fn can_process(&self, product: ProductId) -> bool {
        self.time_per_unit.contains_key(&product)
    }

    /// 訂單在此機台上的加工時間（單位時間 × 數量）
    pub fn processing_time(&self, order: &Order) -> Option<Time> {
        self.time_per_unit
            .get(&order.product)
            .map(|unit| unit * Time::from(order.quantity))
    }
}
