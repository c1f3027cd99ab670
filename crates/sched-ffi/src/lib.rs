//! # Sched FFI
//!
//! Python 綁定層（PyO3）

use pyo3::prelude::*;

pub mod python;

/// Python 模組註冊
#[pymodule]
fn sched_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyPlanningSession>()?;
    m.add_class::<python::PyEngineConfig>()?;
    Ok(())
}
