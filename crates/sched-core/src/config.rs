//! 排程引擎配置

use serde::{Deserialize, Serialize};

use crate::{Color, Result, SchedError, Time};

/// 換線成本參數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchoverConfig {
    /// 一般換線時間
    pub normal_duration: Time,

    /// 高成本換線時間（換入中性色或換成不含過敏原）
    pub costly_duration: Time,

    /// 中性色
    pub neutral_color: Color,
}

impl Default for SwitchoverConfig {
    fn default() -> Self {
        Self {
            normal_duration: 5,
            costly_duration: 25,
            neutral_color: Color::White,
        }
    }
}

impl SwitchoverConfig {
    /// 建構器模式：設置一般換線時間
    pub fn with_normal_duration(mut self, duration: Time) -> Self {
        self.normal_duration = duration;
        self
    }

    /// 建構器模式：設置高成本換線時間
    pub fn with_costly_duration(mut self, duration: Time) -> Self {
        self.costly_duration = duration;
        self
    }

    /// 建構器模式：設置中性色
    pub fn with_neutral_color(mut self, color: Color) -> Self {
        self.neutral_color = color;
        self
    }
}

/// 局部搜尋參數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 是否以 rayon 平行評估候選移動（結果與循序相同）
    pub parallel_sweep: bool,

    /// 最多執行幾輪改善（None 表示直到局部最佳解）
    pub max_sweeps: Option<usize>,

    /// 啟用搬移（relocate）
    pub relocate: bool,

    /// 啟用交換（swap）
    pub swap: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            parallel_sweep: false,
            max_sweeps: None,
            relocate: true,
            swap: true,
        }
    }
}

impl OptimizerConfig {
    /// 建構器模式：設置平行評估
    pub fn with_parallel_sweep(mut self, parallel: bool) -> Self {
        self.parallel_sweep = parallel;
        self
    }

    /// 建構器模式：設置最大改善輪數
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// 建構器模式：設置啟用的移動類型
    pub fn with_moves(mut self, relocate: bool, swap: bool) -> Self {
        self.relocate = relocate;
        self.swap = swap;
        self
    }
}

/// 引擎配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub switchover: SwitchoverConfig,
    pub optimizer: OptimizerConfig,
}

impl EngineConfig {
    /// 建構器模式：設置換線參數
    pub fn with_switchover(mut self, switchover: SwitchoverConfig) -> Self {
        self.switchover = switchover;
        self
    }

    /// 建構器模式：設置搜尋參數
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// 從 JSON 載入並驗證配置（缺少的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.switchover.costly_duration < self.switchover.normal_duration {
            return Err(SchedError::Config(format!(
                "高成本換線時間 {} 小於一般換線時間 {}",
                self.switchover.costly_duration, self.switchover.normal_duration
            )));
        }

        if !self.optimizer.relocate && !self.optimizer.swap {
            return Err(SchedError::Config(
                "搬移與交換至少需啟用一種".to_string(),
            ));
        }

        Ok(())
    }
}
