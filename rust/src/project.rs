//! Working collection of activities keyed by id.

use chrono::{Duration, NaiveDateTime};
use rustc_hash::FxHashMap;
use std::ops::Deref;
use thiserror::Error;

use crate::models::{Activity, ActivityError, ActivityId, Relation};

/// What to do when inserting an activity whose id is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`ProjectError::DuplicateActivity`].
    #[default]
    Reject,
    /// Keep the stored activity and drop the new one.
    Ignore,
    /// Overwrite the stored activity.
    Replace,
}

/// Handle to an activity stored in a [`Project`].
///
/// Reads go through `Deref`. There is no `DerefMut`: swapping in a whole
/// `Activity` could change the id away from the key it is stored under.
#[derive(Debug)]
pub struct ActivityMut<'a>(&'a mut Activity);

impl Deref for ActivityMut<'_> {
    type Target = Activity;

    fn deref(&self) -> &Activity {
        self.0
    }
}

impl ActivityMut<'_> {
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.0.description = description.into();
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.0.duration = duration;
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.0.cost = cost;
    }

    pub fn set_start(&mut self, start: Option<NaiveDateTime>) {
        self.0.start = start;
    }

    pub fn set_finish(&mut self, finish: Option<NaiveDateTime>) {
        self.0.finish = finish;
    }

    pub fn clear_schedule(&mut self) {
        self.0.clear_schedule();
    }

    /// One-sided; prefer [`Project::link`] to keep both lists in step.
    pub fn add_predecessor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.0.add_predecessor(id)
    }

    pub fn add_successor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.0.add_successor(id)
    }

    pub fn remove_predecessor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.0.remove_predecessor(id)
    }

    pub fn remove_successor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.0.remove_successor(id)
    }

    pub fn update_predecessor_id(
        &mut self,
        old_id: ActivityId,
        new_id: ActivityId,
    ) -> Result<(), ActivityError> {
        self.0.update_predecessor_id(old_id, new_id)
    }

    pub fn update_successor_id(
        &mut self,
        old_id: ActivityId,
        new_id: ActivityId,
    ) -> Result<(), ActivityError> {
        self.0.update_successor_id(old_id, new_id)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("activity {0} already exists")]
    DuplicateActivity(ActivityId),
    #[error("activity {0} not found")]
    NotFound(ActivityId),
    #[error(transparent)]
    Relation(#[from] ActivityError),
}

/// Arena of activities. Relationships between entries are plain ids.
#[derive(Debug, Clone, Default)]
pub struct Project {
    activities: FxHashMap<ActivityId, Activity>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a project, rejecting duplicate ids.
    pub fn from_activities(
        activities: impl IntoIterator<Item = Activity>,
    ) -> Result<Self, ProjectError> {
        let mut project = Self::new();
        project.insert_all(activities, DuplicatePolicy::Reject)?;
        Ok(project)
    }

    /// Insert one activity. Returns whether the stored collection changed.
    pub fn insert(
        &mut self,
        activity: Activity,
        policy: DuplicatePolicy,
    ) -> Result<bool, ProjectError> {
        if self.activities.contains_key(&activity.id()) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ProjectError::DuplicateActivity(activity.id()))
                }
                DuplicatePolicy::Ignore => return Ok(false),
                DuplicatePolicy::Replace => {}
            }
        }
        self.activities.insert(activity.id(), activity);
        Ok(true)
    }

    /// Insert many activities, stopping at the first rejected one.
    ///
    /// Returns how many inserts changed the collection.
    pub fn insert_all(
        &mut self,
        activities: impl IntoIterator<Item = Activity>,
        policy: DuplicatePolicy,
    ) -> Result<usize, ProjectError> {
        let mut changed = 0;
        for activity in activities {
            if self.insert(activity, policy)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(&id)
    }

    /// Mutable access to everything but the id the activity is stored under.
    pub fn get_mut(&mut self, id: ActivityId) -> Option<ActivityMut<'_>> {
        self.activities.get_mut(&id).map(ActivityMut)
    }

    /// Fetch several activities by id, skipping ids that are not present.
    pub fn get_many(&self, ids: &[ActivityId]) -> Vec<&Activity> {
        ids.iter().filter_map(|id| self.activities.get(id)).collect()
    }

    /// Remove an activity and drop its id from every other relationship list.
    pub fn remove(&mut self, id: ActivityId) -> Result<Activity, ProjectError> {
        let removed = self
            .activities
            .remove(&id)
            .ok_or(ProjectError::NotFound(id))?;
        for other in self.activities.values_mut() {
            // Missing entries are expected here
            let _ = other.remove_predecessor(id);
            let _ = other.remove_successor(id);
        }
        Ok(removed)
    }

    pub fn contains(&self, id: ActivityId) -> bool {
        self.activities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// All activities in ascending id order.
    pub fn activities(&self) -> Vec<&Activity> {
        let mut all: Vec<&Activity> = self.activities.values().collect();
        all.sort_by_key(|a| a.id());
        all
    }

    /// Consume the project, returning activities in ascending id order.
    pub fn into_activities(self) -> Vec<Activity> {
        let mut all: Vec<Activity> = self.activities.into_values().collect();
        all.sort_by_key(|a| a.id());
        all
    }

    pub fn as_map(&self) -> &FxHashMap<ActivityId, Activity> {
        &self.activities
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut FxHashMap<ActivityId, Activity> {
        &mut self.activities
    }

    /// Record that `predecessor` must finish before `successor` starts.
    ///
    /// Updates both relationship lists or neither.
    pub fn link(
        &mut self,
        predecessor: ActivityId,
        successor: ActivityId,
    ) -> Result<(), ProjectError> {
        let pred = self.get(predecessor).ok_or(ProjectError::NotFound(predecessor))?;
        let succ = self.get(successor).ok_or(ProjectError::NotFound(successor))?;
        if predecessor == successor {
            return Err(ActivityError::SelfReference(predecessor).into());
        }
        if pred.successors().contains(&successor) {
            return Err(ActivityError::DuplicateRelation {
                relation: Relation::Successor,
                id: successor,
            }
            .into());
        }
        if succ.predecessors().contains(&predecessor) {
            return Err(ActivityError::DuplicateRelation {
                relation: Relation::Predecessor,
                id: predecessor,
            }
            .into());
        }

        self.entry_mut(predecessor)?.add_successor(successor)?;
        self.entry_mut(successor)?.add_predecessor(predecessor)?;
        Ok(())
    }

    /// Undo [`Project::link`]. Both sides must currently list each other.
    pub fn unlink(
        &mut self,
        predecessor: ActivityId,
        successor: ActivityId,
    ) -> Result<(), ProjectError> {
        let pred = self.get(predecessor).ok_or(ProjectError::NotFound(predecessor))?;
        let succ = self.get(successor).ok_or(ProjectError::NotFound(successor))?;
        if !pred.successors().contains(&successor) {
            return Err(ActivityError::NotFound {
                relation: Relation::Successor,
                id: successor,
            }
            .into());
        }
        if !succ.predecessors().contains(&predecessor) {
            return Err(ActivityError::NotFound {
                relation: Relation::Predecessor,
                id: predecessor,
            }
            .into());
        }

        self.entry_mut(predecessor)?.remove_successor(successor)?;
        self.entry_mut(successor)?.remove_predecessor(predecessor)?;
        Ok(())
    }

    /// Sum of all activity costs.
    pub fn total_cost(&self) -> f64 {
        self.activities.values().map(|a| a.cost).sum()
    }

    /// Latest finish among scheduled activities.
    pub fn project_finish(&self) -> Option<NaiveDateTime> {
        self.activities.values().filter_map(|a| a.finish).max()
    }

    /// Span from `project_start` to the latest finish.
    pub fn project_duration(&self, project_start: NaiveDateTime) -> Option<Duration> {
        self.project_finish().map(|finish| finish - project_start)
    }

    fn entry_mut(&mut self, id: ActivityId) -> Result<&mut Activity, ProjectError> {
        self.activities.get_mut(&id).ok_or(ProjectError::NotFound(id))
    }
}
