//! 生產訂單模型

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ProductId, Time};

/// 訂單ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.0)
    }
}

/// 生產訂單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    pub id: OrderId,

    /// 產品
    pub product: ProductId,

    /// 數量（必須大於零）
    pub quantity: u32,

    /// 交期（排程時間軸上的時間點）
    pub due: Time,

    /// 顯示名稱
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Order {
    /// 創建新的訂單
    pub fn new(id: OrderId, product: ProductId, quantity: u32, due: Time) -> Self {
        Self {
            id,
            product,
            quantity,
            due,
            name: None,
        }
    }

    /// 建構器模式：設置顯示名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 在 `end` 完工時的延遲時間
    pub fn tardiness_at(&self, end: Time) -> Time {
        end.saturating_sub(self.due)
    }

    /// 在 `end` 完工時是否逾期
    pub fn is_overdue_at(&self, end: Time) -> bool {
        end > self.due
    }
}

/// 無可用機台的訂單
///
/// 訂單的產品沒有任何機台能生產；建構時排除此訂單並回報，
/// 其餘訂單照常排程。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfeasibleOrder {
    /// 訂單ID
    pub order: OrderId,

    /// 無機台可生產的產品
    pub product: ProductId,
}

impl fmt::Display for InfeasibleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "訂單 {} 無可用機台（產品 {}）",
            self.order, self.product
        )
    }
}
