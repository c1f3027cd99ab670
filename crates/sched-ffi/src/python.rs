//! Python 綁定實現
//!
//! 排程、評分與時間軸一律以 JSON 字串傳回，由 Python 端自行呈現。

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;
use serde::Serialize;

use sched_core::{Color, EngineConfig, OptimizerConfig, Problem, SchedError, SwitchoverConfig};
use sched_history::HistoryCursor;
use sched_optimizer::PlanningSession;

fn to_py_err(err: SchedError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python 引擎配置
#[pyclass(name = "EngineConfig")]
#[derive(Clone)]
pub struct PyEngineConfig {
    #[pyo3(get, set)]
    pub normal_duration: u64,
    #[pyo3(get, set)]
    pub costly_duration: u64,
    #[pyo3(get, set)]
    pub neutral_color: String, // "Dark", "Milk", "White"
    #[pyo3(get, set)]
    pub parallel_sweep: bool,
    #[pyo3(get, set)]
    pub max_sweeps: Option<usize>,
    #[pyo3(get, set)]
    pub relocate: bool,
    #[pyo3(get, set)]
    pub swap: bool,
}

#[pymethods]
impl PyEngineConfig {
    #[new]
    #[pyo3(signature = (normal_duration=5, costly_duration=25, neutral_color="White", parallel_sweep=false))]
    fn new(
        normal_duration: u64,
        costly_duration: u64,
        neutral_color: &str,
        parallel_sweep: bool,
    ) -> Self {
        Self {
            normal_duration,
            costly_duration,
            neutral_color: neutral_color.to_string(),
            parallel_sweep,
            max_sweeps: None,
            relocate: true,
            swap: true,
        }
    }
}

/// 內部方法實現（不暴露給 Python）
impl PyEngineConfig {
    /// 轉換為 Rust EngineConfig（內部使用）
    pub(crate) fn to_rust_config(&self) -> PyResult<EngineConfig> {
        let neutral_color = match self.neutral_color.as_str() {
            "Dark" => Color::Dark,
            "Milk" => Color::Milk,
            "White" => Color::White,
            _ => {
                return Err(PyValueError::new_err(format!(
                    "Invalid neutral_color: {}, must be 'Dark', 'Milk', or 'White'",
                    self.neutral_color
                )))
            }
        };

        let switchover = SwitchoverConfig::default()
            .with_normal_duration(self.normal_duration)
            .with_costly_duration(self.costly_duration)
            .with_neutral_color(neutral_color);

        let mut optimizer = OptimizerConfig::default()
            .with_parallel_sweep(self.parallel_sweep)
            .with_moves(self.relocate, self.swap);
        if let Some(max) = self.max_sweeps {
            optimizer = optimizer.with_max_sweeps(max);
        }

        let config = EngineConfig::default()
            .with_switchover(switchover)
            .with_optimizer(optimizer);
        config.validate().map_err(to_py_err)?;

        Ok(config)
    }
}

/// Python 規劃工作階段
#[pyclass(name = "PlanningSession")]
pub struct PyPlanningSession {
    inner: PlanningSession,
    cursor: HistoryCursor,
}

impl PyPlanningSession {
    fn build(problem: Problem, config: EngineConfig) -> PyResult<Self> {
        let inner = PlanningSession::new(problem, config).map_err(to_py_err)?;
        Ok(Self {
            inner,
            cursor: HistoryCursor::new(),
        })
    }

    fn snapshot(&self, index: usize) -> PyResult<&sched_history::Snapshot> {
        self.inner.ledger().get(index).ok_or_else(|| {
            PyIndexError::new_err(format!(
                "snapshot index {} out of range ({} snapshots)",
                index,
                self.inner.ledger().len()
            ))
        })
    }
}

#[pymethods]
impl PyPlanningSession {
    #[new]
    #[pyo3(signature = (problem_json, config=None))]
    fn new(problem_json: &str, config: Option<PyRef<'_, PyEngineConfig>>) -> PyResult<Self> {
        let problem = Problem::from_json_str(problem_json).map_err(to_py_err)?;
        let config = match config {
            Some(config) => config.to_rust_config()?,
            None => EngineConfig::default(),
        };
        Self::build(problem, config)
    }

    /// 以 JSON 建立（配置缺少的欄位使用預設值）
    #[staticmethod]
    #[pyo3(signature = (problem_json, config_json=None))]
    fn from_json(problem_json: &str, config_json: Option<&str>) -> PyResult<Self> {
        let problem = Problem::from_json_str(problem_json).map_err(to_py_err)?;
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(json).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };
        Self::build(problem, config)
    }

    /// 前進一步，返回新的狀態名稱
    fn step(&mut self) -> &'static str {
        self.inner.step();
        self.cursor.last(self.inner.ledger());
        self.inner.phase().as_str()
    }

    /// 執行到局部最佳解，返回改善輪數
    fn run(&mut self) -> usize {
        let improvements = self.inner.run_to_local_optimum();
        self.cursor.last(self.inner.ledger());
        improvements
    }

    #[getter]
    fn phase(&self) -> &'static str {
        self.inner.phase().as_str()
    }

    fn snapshot_count(&self) -> usize {
        self.inner.ledger().len()
    }

    /// 改善前（建構完成）的快照索引
    fn construction_end(&self) -> Option<usize> {
        self.inner.ledger().construction_end()
    }

    fn snapshot_json(&self, index: usize) -> PyResult<String> {
        to_json(self.snapshot(index)?)
    }

    fn score_json(&self, index: usize) -> PyResult<String> {
        to_json(&self.snapshot(index)?.score)
    }

    fn timeline_json(&self, index: usize) -> PyResult<String> {
        self.snapshot(index)?;
        match self.inner.timeline(index) {
            Some(timeline) => to_json(&timeline),
            None => Err(PyIndexError::new_err(format!("snapshot index {} out of range", index))),
        }
    }

    fn infeasible_json(&self) -> PyResult<String> {
        to_json(&self.inner.infeasible_orders())
    }

    // 歷史瀏覽

    #[getter]
    fn cursor(&self) -> usize {
        self.cursor.index()
    }

    fn first(&mut self) -> usize {
        self.cursor.first();
        self.cursor.index()
    }

    fn previous(&mut self) -> bool {
        self.cursor.previous()
    }

    fn next(&mut self) -> bool {
        self.cursor.next(self.inner.ledger())
    }

    fn last(&mut self) -> usize {
        self.cursor.last(self.inner.ledger());
        self.cursor.index()
    }

    fn pre_optimization(&mut self) -> bool {
        self.cursor.pre_optimization(self.inner.ledger())
    }
}
