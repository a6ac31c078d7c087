//! Activity dependency graph and timeline scheduling.
//!
//! Activities live in a [`Project`] keyed by id. [`DependencyGraph`] validates
//! the successor relationships and produces a topological order, and the
//! scheduler's forward pass walks that order to assign start and finish
//! instants from a project start date.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod config;
pub mod graph;
pub mod id_list;
pub mod logging;
pub mod models;
pub mod project;
#[cfg(feature = "python")]
mod python;
pub mod scheduler;
pub mod sorting;

pub use config::SchedulingConfig;
pub use graph::{DependencyGraph, GraphError};
pub use id_list::{join_ids, parse_ids, IdListError};
pub use models::{duration_from_seconds, Activity, ActivityError, ActivityId, Relation};
pub use project::{ActivityMut, DuplicatePolicy, Project, ProjectError};
pub use scheduler::{forward_pass, schedule_activities, ScheduleError};
pub use sorting::{order_activities, sort_activities, SortField, SortingError};
