//! PyO3 bindings for ordering and scheduling activities.
//!
//! Durations cross the boundary as seconds; instants as naive datetimes.

use chrono::NaiveDateTime;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::SchedulingConfig;
use crate::graph::DependencyGraph;
use crate::id_list::join_ids;
use crate::models::{duration_from_seconds, Activity, ActivityId};
use crate::project::Project;
use crate::scheduler::schedule_activities;
use crate::sorting::{sort_activities, SortField};

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Activity as seen from Python.
#[pyclass(name = "Activity")]
#[derive(Clone, Debug)]
pub struct PyActivity {
    #[pyo3(get, set)]
    pub id: ActivityId,
    #[pyo3(get, set)]
    pub description: String,
    #[pyo3(get, set)]
    pub duration_seconds: f64,
    #[pyo3(get, set)]
    pub cost: f64,
    #[pyo3(get, set)]
    pub predecessors: Vec<ActivityId>,
    #[pyo3(get, set)]
    pub successors: Vec<ActivityId>,
    #[pyo3(get, set)]
    pub start: Option<NaiveDateTime>,
    #[pyo3(get, set)]
    pub finish: Option<NaiveDateTime>,
}

#[pymethods]
impl PyActivity {
    #[new]
    #[pyo3(signature = (id, description, duration_seconds, cost=0.0, predecessors=None, successors=None))]
    fn new(
        id: ActivityId,
        description: String,
        duration_seconds: f64,
        cost: f64,
        predecessors: Option<Vec<ActivityId>>,
        successors: Option<Vec<ActivityId>>,
    ) -> Self {
        Self {
            id,
            description,
            duration_seconds,
            cost,
            predecessors: predecessors.unwrap_or_default(),
            successors: successors.unwrap_or_default(),
            start: None,
            finish: None,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Activity(id={}, description={:?}, duration_seconds={}, predecessors=[{}], successors=[{}])",
            self.id,
            self.description,
            self.duration_seconds,
            join_ids(&self.predecessors),
            join_ids(&self.successors)
        )
    }
}

impl PyActivity {
    fn to_activity(&self) -> PyResult<Activity> {
        let duration = duration_from_seconds(self.duration_seconds).ok_or_else(|| {
            value_error(format!(
                "activity {} has an out of range duration {}",
                self.id, self.duration_seconds
            ))
        })?;
        let mut activity = Activity::new(self.id, self.description.clone(), duration, self.cost)
            .with_predecessors(self.predecessors.iter().copied())
            .and_then(|a| a.with_successors(self.successors.iter().copied()))
            .map_err(value_error)?;
        activity.start = self.start;
        activity.finish = self.finish;
        Ok(activity)
    }

    fn from_activity(activity: &Activity) -> Self {
        Self {
            id: activity.id(),
            description: activity.description.clone(),
            duration_seconds: activity.duration.num_milliseconds() as f64 / 1000.0,
            cost: activity.cost,
            predecessors: activity.predecessors().to_vec(),
            successors: activity.successors().to_vec(),
            start: activity.start,
            finish: activity.finish,
        }
    }
}

fn to_activities(activities: &[PyActivity]) -> PyResult<Vec<Activity>> {
    activities.iter().map(PyActivity::to_activity).collect()
}

/// Topologically order activities by their successor lists.
///
/// # Raises
/// * ValueError on duplicate ids, unknown successors, or cycles
#[pyfunction]
fn topological_order(activities: Vec<PyActivity>) -> PyResult<Vec<ActivityId>> {
    let activities = to_activities(&activities)?;
    let graph = DependencyGraph::build(&activities).map_err(value_error)?;
    Ok(graph.topological_order())
}

/// Compute start and finish for every activity.
///
/// # Returns
/// * The activities with start/finish set, in the order they were scheduled
///
/// # Raises
/// * ValueError if the dependency graph is invalid or scheduling fails
#[pyfunction]
#[pyo3(signature = (activities, project_start, verbosity=0))]
fn schedule(
    activities: Vec<PyActivity>,
    project_start: NaiveDateTime,
    verbosity: u8,
) -> PyResult<Vec<PyActivity>> {
    let mut project = Project::from_activities(to_activities(&activities)?).map_err(value_error)?;
    let config = SchedulingConfig::new(project_start).with_verbosity(verbosity);
    let order = schedule_activities(&mut project, &config).map_err(value_error)?;
    Ok(project
        .get_many(&order)
        .into_iter()
        .map(PyActivity::from_activity)
        .collect())
}

/// Stable sort by one of: id, description, duration, start, finish, cost.
#[pyfunction]
#[pyo3(name = "sort_activities")]
fn py_sort_activities(activities: Vec<PyActivity>, field: &str) -> PyResult<Vec<PyActivity>> {
    let field: SortField = field.parse().map_err(value_error)?;
    let mut activities = to_activities(&activities)?;
    sort_activities(&mut activities, field);
    Ok(activities.iter().map(PyActivity::from_activity).collect())
}

/// The verano.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyActivity>()?;

    m.add_function(wrap_pyfunction!(topological_order, m)?)?;
    m.add_function(wrap_pyfunction!(schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_sort_activities, m)?)?;

    Ok(())
}
