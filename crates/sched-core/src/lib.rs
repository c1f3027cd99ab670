//! # Scheduling Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod machine;
pub mod order;
pub mod problem;
pub mod product;
pub mod schedule;
pub mod score;

// Re-export 主要類型
pub use config::{EngineConfig, OptimizerConfig, SwitchoverConfig};
pub use machine::{Machine, MachineId};
pub use order::{InfeasibleOrder, Order, OrderId};
pub use problem::{Problem, ProblemData};
pub use product::{Color, Product, ProductId};
pub use schedule::Schedule;
pub use score::{MachineScore, Score};

/// 時間軸上的時間單位（與實際日期無關）
pub type Time = u64;

/// 排程錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    #[error("找不到產品: {0}")]
    UnknownProduct(ProductId),

    #[error("找不到機台: {0}")]
    UnknownMachine(MachineId),

    #[error("找不到訂單: {0}")]
    UnknownOrder(OrderId),

    #[error("產品ID重複: {0}")]
    DuplicateProduct(ProductId),

    #[error("機台ID重複: {0}")]
    DuplicateMachine(MachineId),

    #[error("訂單ID重複: {0}")]
    DuplicateOrder(OrderId),

    #[error("訂單 {0} 的數量必須大於零")]
    InvalidQuantity(OrderId),

    #[error("機台 {machine} 對產品 {product} 的單位加工時間必須大於零")]
    InvalidProcessingTime {
        machine: MachineId,
        product: ProductId,
    },

    #[error("至少需要一台機台")]
    NoMachines,

    #[error("訂單 {order} 在機台 {machine} 上的加工時間超出時間範圍")]
    ProcessingTimeOverflow { machine: MachineId, order: OrderId },

    #[error("排程總時間超出時間範圍")]
    HorizonOverflow,

    #[error("{0}")]
    InfeasibleOrder(InfeasibleOrder),

    #[error("配置錯誤: {0}")]
    Config(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfeasibleOrder> for SchedError {
    fn from(infeasible: InfeasibleOrder) -> Self {
        SchedError::InfeasibleOrder(infeasible)
    }
}

pub type Result<T> = std::result::Result<T, SchedError>;
