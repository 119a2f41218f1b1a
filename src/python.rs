//! Python bindings for the chapter simulator using PyO3

use crate::config::GameConfig;
use crate::error::SimError;
use crate::simulation::{simulate, simulate_profile, sweep_profiles};
use crate::stats::SimReport;
use pyo3::prelude::*;

fn to_py_err(e: SimError) -> PyErr {
    match e {
        SimError::Io(_) => PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()),
        e if e.is_invariant_violation() => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()),
        e => PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()),
    }
}

fn run(py: Python<'_>, config: &GameConfig, profile: Option<&str>) -> PyResult<String> {
    let settings = config.engine_settings();

    // Release GIL during computation
    let report: SimReport = py
        .allow_threads(|| match profile {
            Some(name) => simulate_profile(config, name, settings),
            None => simulate(config, settings),
        })
        .map_err(to_py_err)?;

    serde_json::to_string(&report)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Failed to serialize results: {}", e)))
}

/// Simulate from a JSON config string, returning the report as JSON
#[pyfunction]
#[pyo3(signature = (config_json, profile=None))]
fn simulate_json(py: Python<'_>, config_json: &str, profile: Option<&str>) -> PyResult<String> {
    let config = GameConfig::from_json(config_json).map_err(to_py_err)?;
    run(py, &config, profile)
}

/// Simulate from a YAML or JSON file, returning the report as JSON
#[pyfunction]
#[pyo3(signature = (config_path, profile=None))]
fn simulate_from_file(py: Python<'_>, config_path: &str, profile: Option<&str>) -> PyResult<String> {
    let config = GameConfig::from_file(config_path).map_err(to_py_err)?;
    run(py, &config, profile)
}

/// Simulate every behavior profile, returning the sweep summary as JSON
#[pyfunction]
#[pyo3(signature = (config_json, parallel=true))]
fn sweep_json(py: Python<'_>, config_json: &str, parallel: bool) -> PyResult<String> {
    let config = GameConfig::from_json(config_json).map_err(to_py_err)?;
    let settings = config.engine_settings();

    let sweep = py.allow_threads(|| sweep_profiles(&config, settings, parallel));

    serde_json::to_string(&sweep)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Failed to serialize results: {}", e)))
}

/// Get number of available CPU cores
#[pyfunction]
fn get_available_cores() -> PyResult<usize> {
    Ok(num_cpus::get())
}

/// Python module definition
#[pymodule]
fn chapter_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_json, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(sweep_json, m)?)?;
    m.add_function(wrap_pyfunction!(get_available_cores, m)?)?;
    Ok(())
}
