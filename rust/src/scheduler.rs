//! Forward pass computing start and finish instants in dependency order.

use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::SchedulingConfig;
use crate::graph::{DependencyGraph, GraphError};
use crate::models::{Activity, ActivityId};
use crate::project::Project;
use crate::{log_changes, log_checks, log_debug};

/// Errors that can occur during scheduling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("activity {0} in the order is not in the collection")]
    UnknownActivity(ActivityId),
    #[error("activity {activity} lists unknown predecessor {predecessor}")]
    UnknownPredecessor {
        activity: ActivityId,
        predecessor: ActivityId,
    },
    #[error("predecessor {predecessor} of activity {activity} is not scheduled yet")]
    UnscheduledPredecessor {
        activity: ActivityId,
        predecessor: ActivityId,
    },
    #[error("finish of activity {0} is out of range")]
    Overflow(ActivityId),
}

/// Earliest start of an activity: the latest predecessor finish, or the project
/// start if that is later.
fn earliest_start(
    activities: &FxHashMap<ActivityId, Activity>,
    activity: &Activity,
    project_start: NaiveDateTime,
    verbosity: u8,
) -> Result<NaiveDateTime, ScheduleError> {
    let mut earliest = project_start;
    for &pred_id in activity.predecessors() {
        let pred = activities
            .get(&pred_id)
            .ok_or(ScheduleError::UnknownPredecessor {
                activity: activity.id(),
                predecessor: pred_id,
            })?;
        let finish = pred.finish.ok_or(ScheduleError::UnscheduledPredecessor {
            activity: activity.id(),
            predecessor: pred_id,
        })?;
        if finish > earliest {
            log_checks!(
                verbosity,
                "activity {} pushed to {} by predecessor {}",
                activity.id(),
                finish,
                pred_id
            );
            earliest = finish;
        }
    }
    Ok(earliest)
}

/// Compute start and finish for every activity in `order`, in place.
///
/// Existing start/finish values across the whole collection are cleared first,
/// so a predecessor that comes after its dependent in `order` is reported as
/// [`ScheduleError::UnscheduledPredecessor`]. Activities missing from `order`
/// stay unscheduled. On error the collection is left partially scheduled.
pub fn forward_pass(
    activities: &mut FxHashMap<ActivityId, Activity>,
    order: &[ActivityId],
    config: &SchedulingConfig,
) -> Result<(), ScheduleError> {
    for activity in activities.values_mut() {
        activity.clear_schedule();
    }

    for &id in order {
        let activity = activities
            .get(&id)
            .ok_or(ScheduleError::UnknownActivity(id))?;
        let start = earliest_start(activities, activity, config.project_start, config.verbosity)?;
        let finish = start
            .checked_add_signed(activity.duration)
            .ok_or(ScheduleError::Overflow(id))?;

        let activity = activities
            .get_mut(&id)
            .ok_or(ScheduleError::UnknownActivity(id))?;
        activity.start = Some(start);
        activity.finish = Some(finish);
        log_changes!(
            config.verbosity,
            "scheduled activity {} ({}) from {} to {}",
            id,
            activity.description,
            start,
            finish
        );
    }
    Ok(())
}

/// Validate the project's dependency graph and schedule it.
///
/// The graph's topological order is consumed immediately by the forward pass;
/// it is returned for callers that want to present activities in that order.
pub fn schedule_activities(
    project: &mut Project,
    config: &SchedulingConfig,
) -> Result<Vec<ActivityId>, ScheduleError> {
    let graph = DependencyGraph::build(project.as_map().values())?;
    let order = graph.topological_order();
    log_debug!(
        config.verbosity,
        "built graph with {} activities and {} edges, order {:?}",
        graph.len(),
        graph.edges().len(),
        order
    );

    forward_pass(project.as_map_mut(), &order, config)?;
    Ok(order)
}
