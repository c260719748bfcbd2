//! Python bindings for the scheduling engine.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::{PyFileNotFoundError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::ImportConfig;
use crate::import::{from_csv, ImportError};
use crate::models::{Days, Task, TaskSet};
use crate::{analyze, Analysis, Error};

/// Task record (PyO3 wrapper).
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub uid: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: Days,
    #[pyo3(get, set)]
    pub depends_on: Vec<String>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (uid, name, duration, depends_on=Vec::new()))]
    fn new(uid: String, name: String, duration: Days, depends_on: Vec<String>) -> Self {
        Self {
            uid,
            name,
            duration,
            depends_on,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(uid={:?}, name={:?}, duration={}, depends_on={:?})",
            self.uid, self.name, self.duration, self.depends_on
        )
    }
}

type PySchedule = (HashMap<String, Days>, HashMap<String, Days>, Vec<String>);

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Import(ImportError::MissingInput(path)) => {
            PyFileNotFoundError::new_err(path.display().to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

fn into_py_schedule(analysis: Analysis) -> PySchedule {
    let Analysis {
        schedule,
        critical_path,
        ..
    } = analysis;
    (
        schedule.earliest_start.into_iter().collect(),
        schedule.latest_start.into_iter().collect(),
        critical_path.nodes,
    )
}

/// Compute earliest starts, latest starts, and the critical path for tasks.
///
/// # Returns
/// * `(es, ls, critical_path)`: two name -> day-offset dicts and an ordered list
///
/// # Raises
/// * ValueError on duplicate uids, invalid references, or cycles
#[pyfunction]
fn schedule_tasks(tasks: Vec<PyTask>) -> PyResult<PySchedule> {
    let mut set = TaskSet::new();
    for task in tasks {
        set.insert(Task::new(task.uid, task.name, task.duration, task.depends_on))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
    }
    analyze(&set).map(into_py_schedule).map_err(to_py_err)
}

/// Load tasks from a CSV file and schedule them.
///
/// # Raises
/// * FileNotFoundError if the path does not exist
/// * ValueError on malformed records, invalid references, or cycles
#[pyfunction]
#[pyo3(signature = (path, delimiter=None))]
fn schedule_csv(path: PathBuf, delimiter: Option<char>) -> PyResult<PySchedule> {
    let config = ImportConfig::new(delimiter);
    let tasks = from_csv(&path, &config).map_err(|e| to_py_err(e.into()))?;
    analyze(&tasks).map(into_py_schedule).map_err(to_py_err)
}

/// The critpath Python module.
#[pymodule]
fn critpath(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_function(wrap_pyfunction!(schedule_tasks, m)?)?;
    m.add_function(wrap_pyfunction!(schedule_csv, m)?)?;
    Ok(())
}
