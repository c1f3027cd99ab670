//! 產品模型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 產品ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// 產品顏色
///
/// 僅用於換線成本判斷；其中一種顏色在配置中被視為「中性色」
/// （預設為 [`Color::White`]）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// 黑巧克力
    Dark,
    /// 牛奶巧克力
    Milk,
    /// 白巧克力
    White,
}

/// 產品
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: ProductId,

    /// 顏色
    pub color: Color,

    /// 是否含過敏原
    pub has_allergen: bool,
}

impl Product {
    /// 創建不含過敏原的產品
    pub fn new(id: ProductId, color: Color) -> Self {
        Self {
            id,
            color,
            has_allergen: false,
        }
    }

    /// 建構器模式：設置是否含過敏原
    pub fn with_allergen(mut self, has_allergen: bool) -> Self {
        self.has_allergen = has_allergen;
        self
    }

    /// 檢查是否不含過敏原
    pub fn is_allergen_free(&self) -> bool {
        !self.has_allergen
    }
}
