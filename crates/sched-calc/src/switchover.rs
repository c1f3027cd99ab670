//! 換線成本規則

use sched_core::{Order, Problem, Product, SwitchoverConfig, Time};
use serde::{Deserialize, Serialize};

/// 兩張相鄰訂單之間的換線
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switchover {
    /// 換線時間
    pub duration: Time,
    /// 是否為高成本換線
    pub costly: bool,
}

/// 換線成本規則
///
/// 有方向性：只比較同一台機台上直接相鄰的前後兩張訂單。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchoverPolicy {
    config: SwitchoverConfig,
}

impl SwitchoverPolicy {
    pub fn new(config: SwitchoverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwitchoverConfig {
        &self.config
    }

    /// 計算前後兩個產品之間的換線
    ///
    /// 以下任一條件成立即為高成本（兩者獨立判斷，不重複計費）：
    /// - 由非中性色換入中性色
    /// - 由含過敏原換成不含過敏原（需清洗）
    pub fn between(&self, prev: &Product, next: &Product) -> Switchover {
        let neutral = self.config.neutral_color;
        let expensive_color_switch = prev.color != neutral && next.color == neutral;
        let switch_to_allergen_free = prev.has_allergen && !next.has_allergen;

        if expensive_color_switch || switch_to_allergen_free {
            Switchover {
                duration: self.config.costly_duration,
                costly: true,
            }
        } else {
            Switchover {
                duration: self.config.normal_duration,
                costly: false,
            }
        }
    }

    /// 計算前後兩張訂單之間的換線
    pub fn between_orders(&self, problem: &Problem, prev: &Order, next: &Order) -> Switchover {
        self.between(
            problem.resolve_product(prev.product),
            problem.resolve_product(next.product),
        )
    }
}

impl Default for SwitchoverPolicy {
    fn default() -> Self {
        Self::new(SwitchoverConfig::default())
    }
}
