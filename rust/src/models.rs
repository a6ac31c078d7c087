//! Core data types for the scheduling system.

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

/// Identity key of an activity within a project.
pub type ActivityId = i64;

/// Convert fractional seconds to a duration rounded to the millisecond.
///
/// `None` for non-finite input or a value outside the representable range.
pub fn duration_from_seconds(seconds: f64) -> Option<Duration> {
    let millis = (seconds * 1000.0).round();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if !millis.is_finite() || millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Which of the two relationship lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Predecessor,
    Successor,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Predecessor => write!(f, "predecessor"),
            Relation::Successor => write!(f, "successor"),
        }
    }
}

/// Errors raised by relationship mutations on a single activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityError {
    #[error("{relation} with id {id} already exists")]
    DuplicateRelation { relation: Relation, id: ActivityId },
    #[error("no {relation} with id {id}")]
    NotFound { relation: Relation, id: ActivityId },
    #[error("activity {0} cannot be its own predecessor or successor")]
    SelfReference(ActivityId),
}

/// A schedulable unit of work.
///
/// Relationships to other activities are plain ids resolved by lookup in the
/// owning collection. Both lists keep insertion order and never hold duplicates.
/// The id is fixed at construction, since collections key activities by it.
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    id: ActivityId,
    pub description: String,
    pub duration: Duration,
    pub cost: f64,
    /// Set by the scheduler; `None` until the activity has been scheduled.
    pub start: Option<NaiveDateTime>,
    pub finish: Option<NaiveDateTime>,
    predecessors: Vec<ActivityId>,
    successors: Vec<ActivityId>,
}

impl Activity {
    pub fn new(
        id: ActivityId,
        description: impl Into<String>,
        duration: Duration,
        cost: f64,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            duration,
            cost,
            start: None,
            finish: None,
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// Add each id as a predecessor, failing on the first rejected id.
    pub fn with_predecessors(
        mut self,
        ids: impl IntoIterator<Item = ActivityId>,
    ) -> Result<Self, ActivityError> {
        for id in ids {
            self.add_predecessor(id)?;
        }
        Ok(self)
    }

    /// Add each id as a successor, failing on the first rejected id.
    pub fn with_successors(
        mut self,
        ids: impl IntoIterator<Item = ActivityId>,
    ) -> Result<Self, ActivityError> {
        for id in ids {
            self.add_successor(id)?;
        }
        Ok(self)
    }

    pub fn id(&self) -> ActivityId {
        self.id
    }

    pub fn predecessors(&self) -> &[ActivityId] {
        &self.predecessors
    }

    pub fn successors(&self) -> &[ActivityId] {
        &self.successors
    }

    pub fn is_scheduled(&self) -> bool {
        self.start.is_some() && self.finish.is_some()
    }

    pub fn add_predecessor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.add(Relation::Predecessor, id)
    }

    pub fn add_successor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.add(Relation::Successor, id)
    }

    pub fn remove_predecessor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.remove(Relation::Predecessor, id)
    }

    pub fn remove_successor(&mut self, id: ActivityId) -> Result<(), ActivityError> {
        self.remove(Relation::Successor, id)
    }

    /// Replace `old_id` with `new_id` in place.
    ///
    /// Rejects a `new_id` that is already listed, so the list stays a set.
    pub fn update_predecessor_id(
        &mut self,
        old_id: ActivityId,
        new_id: ActivityId,
    ) -> Result<(), ActivityError> {
        self.update(Relation::Predecessor, old_id, new_id)
    }

    /// Successor counterpart of [`Activity::update_predecessor_id`].
    pub fn update_successor_id(
        &mut self,
        old_id: ActivityId,
        new_id: ActivityId,
    ) -> Result<(), ActivityError> {
        self.update(Relation::Successor, old_id, new_id)
    }

    /// Forget any previously computed start/finish.
    pub fn clear_schedule(&mut self) {
        self.start = None;
        self.finish = None;
    }

    fn list_mut(&mut self, relation: Relation) -> &mut Vec<ActivityId> {
        match relation {
            Relation::Predecessor => &mut self.predecessors,
            Relation::Successor => &mut self.successors,
        }
    }

    fn add(&mut self, relation: Relation, id: ActivityId) -> Result<(), ActivityError> {
        if id == self.id {
            return Err(ActivityError::SelfReference(id));
        }
        let list = self.list_mut(relation);
        if list.contains(&id) {
            return Err(ActivityError::DuplicateRelation { relation, id });
        }
        list.push(id);
        Ok(())
    }

    fn remove(&mut self, relation: Relation, id: ActivityId) -> Result<(), ActivityError> {
        let list = self.list_mut(relation);
        let Some(idx) = list.iter().position(|&x| x == id) else {
            return Err(ActivityError::NotFound { relation, id });
        };
        // Vec::remove shifts the tail, preserving relative order
        list.remove(idx);
        Ok(())
    }

    fn update(
        &mut self,
        relation: Relation,
        old_id: ActivityId,
        new_id: ActivityId,
    ) -> Result<(), ActivityError> {
        let own_id = self.id;
        let list = self.list_mut(relation);
        let Some(idx) = list.iter().position(|&x| x == old_id) else {
            return Err(ActivityError::NotFound {
                relation,
                id: old_id,
            });
        };
        if old_id == new_id {
            return Ok(());
        }
        if new_id == own_id {
            return Err(ActivityError::SelfReference(new_id));
        }
        if list.contains(&new_id) {
            return Err(ActivityError::DuplicateRelation {
                relation,
                id: new_id,
            });
        }
        list[idx] = new_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(id: ActivityId) -> Activity {
        Activity::new(id, format!("activity {}", id), Duration::minutes(10), 0.0)
    }

    #[test]
    fn test_new_activity_is_unscheduled() {
        let a = make_activity(1);
        assert!(a.predecessors().is_empty());
        assert!(a.successors().is_empty());
        assert!(a.start.is_none());
        assert!(a.finish.is_none());
        assert!(!a.is_scheduled());
    }

    #[test]
    fn test_add_predecessor_twice_rejected() {
        let mut a = make_activity(1);
        assert_eq!(a.add_predecessor(2), Ok(()));
        assert_eq!(
            a.add_predecessor(2),
            Err(ActivityError::DuplicateRelation {
                relation: Relation::Predecessor,
                id: 2
            })
        );
        assert_eq!(a.predecessors(), &[2]);
    }

    #[test]
    fn test_add_successor_preserves_insertion_order() {
        let mut a = make_activity(1);
        a.add_successor(5).unwrap();
        a.add_successor(3).unwrap();
        a.add_successor(4).unwrap();
        assert_eq!(a.successors(), &[5, 3, 4]);
        assert!(matches!(
            a.add_successor(3),
            Err(ActivityError::DuplicateRelation { .. })
        ));
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut a = make_activity(7);
        assert_eq!(a.add_predecessor(7), Err(ActivityError::SelfReference(7)));
        assert_eq!(a.add_successor(7), Err(ActivityError::SelfReference(7)));
        assert!(a.predecessors().is_empty());
        assert!(a.successors().is_empty());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut a = make_activity(1).with_predecessors([2, 3, 4, 5]).unwrap();
        a.remove_predecessor(3).unwrap();
        assert_eq!(a.predecessors(), &[2, 4, 5]);
    }

    #[test]
    fn test_remove_missing_fails() {
        let mut a = make_activity(1).with_successors([2]).unwrap();
        assert_eq!(
            a.remove_successor(9),
            Err(ActivityError::NotFound {
                relation: Relation::Successor,
                id: 9
            })
        );
        assert_eq!(a.successors(), &[2]);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut a = make_activity(1).with_successors([2, 3, 4]).unwrap();
        a.update_successor_id(3, 8).unwrap();
        assert_eq!(a.successors(), &[2, 8, 4]);
    }

    #[test]
    fn test_update_missing_old_id_fails() {
        let mut a = make_activity(1).with_predecessors([2]).unwrap();
        assert_eq!(
            a.update_predecessor_id(3, 4),
            Err(ActivityError::NotFound {
                relation: Relation::Predecessor,
                id: 3
            })
        );
    }

    #[test]
    fn test_update_to_existing_id_rejected() {
        // Merging two ids would leave a duplicate in the list
        let mut a = make_activity(1).with_predecessors([2, 3]).unwrap();
        assert_eq!(
            a.update_predecessor_id(2, 3),
            Err(ActivityError::DuplicateRelation {
                relation: Relation::Predecessor,
                id: 3
            })
        );
        assert_eq!(a.predecessors(), &[2, 3]);
    }

    #[test]
    fn test_update_to_self_rejected() {
        let mut a = make_activity(1).with_successors([2]).unwrap();
        assert_eq!(
            a.update_successor_id(2, 1),
            Err(ActivityError::SelfReference(1))
        );
    }

    #[test]
    fn test_update_same_id_is_noop() {
        let mut a = make_activity(1).with_successors([2]).unwrap();
        assert_eq!(a.update_successor_id(2, 2), Ok(()));
        assert_eq!(a.successors(), &[2]);
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let result = make_activity(1).with_predecessors([2, 2]);
        assert!(matches!(
            result,
            Err(ActivityError::DuplicateRelation { id: 2, .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ActivityError::NotFound {
            relation: Relation::Successor,
            id: 4,
        };
        assert_eq!(err.to_string(), "no successor with id 4");
        let err = ActivityError::DuplicateRelation {
            relation: Relation::Predecessor,
            id: 2,
        };
        assert_eq!(err.to_string(), "predecessor with id 2 already exists");
    }

    #[test]
    fn test_duration_from_seconds() {
        assert_eq!(duration_from_seconds(1.5), Some(Duration::milliseconds(1500)));
        assert_eq!(duration_from_seconds(0.0004), Some(Duration::zero()));
        assert_eq!(duration_from_seconds(-2.0), Some(Duration::seconds(-2)));
        assert_eq!(duration_from_seconds(f64::NAN), None);
        assert_eq!(duration_from_seconds(f64::INFINITY), None);
    }

    #[test]
    fn test_duration_from_seconds_out_of_range() {
        // Would saturate to i64::MIN/MAX milliseconds if cast unchecked
        assert_eq!(duration_from_seconds(1e300), None);
        assert_eq!(duration_from_seconds(-1e300), None);
        assert_eq!(duration_from_seconds(f64::MAX), None);
        assert!(duration_from_seconds(9.0e15).is_some());
    }
}
