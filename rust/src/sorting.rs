//! Presentation orderings over activity collections.
//!
//! Every sort is stable: activities that compare equal keep their prior
//! relative order. None of this affects scheduling.

use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Activity, ActivityId};

/// Errors that can occur while ordering activities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortingError {
    #[error("unknown sort field: {0}")]
    UnknownField(String),
    #[error("order has {actual} ids but there are {expected} activities")]
    OrderMismatch { expected: usize, actual: usize },
    #[error("activity {0} in the order is not in the collection")]
    ActivityNotFound(ActivityId),
}

/// Field to sort activities by, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Description,
    Duration,
    /// Unscheduled activities sort first.
    Start,
    /// Unscheduled activities sort first.
    Finish,
    Cost,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Description => "description",
            Self::Duration => "duration",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Cost => "cost",
        }
    }

    /// Compare two activities on this field only.
    pub fn compare(&self, a: &Activity, b: &Activity) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Description => a.description.cmp(&b.description),
            Self::Duration => a.duration.cmp(&b.duration),
            Self::Start => a.start.cmp(&b.start),
            Self::Finish => a.finish.cmp(&b.finish),
            Self::Cost => cmp_f64(a.cost, b.cost),
        }
    }
}

impl FromStr for SortField {
    type Err = SortingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "description" => Ok(Self::Description),
            "duration" => Ok(Self::Duration),
            "start" => Ok(Self::Start),
            "finish" => Ok(Self::Finish),
            "cost" => Ok(Self::Cost),
            other => Err(SortingError::UnknownField(other.to_string())),
        }
    }
}

/// Compare two f64 values, treating -0.0 and 0.0 (and any NaN) as equal.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Stable sort of owned or borrowed activities by one field.
pub fn sort_activities<A: Borrow<Activity>>(activities: &mut [A], field: SortField) {
    activities.sort_by(|a, b| field.compare(a.borrow(), b.borrow()));
}

/// Look up activities in the given id order.
///
/// The order must name every activity exactly as many times as there are
/// activities; a length mismatch is rejected before any lookup.
pub fn order_activities<'a>(
    activities: &'a FxHashMap<ActivityId, Activity>,
    order: &[ActivityId],
) -> Result<Vec<&'a Activity>, SortingError> {
    if activities.len() != order.len() {
        return Err(SortingError::OrderMismatch {
            expected: activities.len(),
            actual: order.len(),
        });
    }
    order
        .iter()
        .map(|id| {
            activities
                .get(id)
                .ok_or(SortingError::ActivityNotFound(*id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn make_date(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 4)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn make_activity(id: ActivityId, description: &str, minutes: i64, cost: f64) -> Activity {
        Activity::new(id, description, Duration::minutes(minutes), cost)
    }

    fn ids<A: Borrow<Activity>>(activities: &[A]) -> Vec<ActivityId> {
        activities.iter().map(|a| a.borrow().id()).collect()
    }

    #[test]
    fn test_sort_by_id() {
        let mut activities = vec![
            make_activity(3, "c", 1, 0.0),
            make_activity(1, "a", 1, 0.0),
            make_activity(2, "b", 1, 0.0),
        ];
        sort_activities(&mut activities, SortField::Id);
        assert_eq!(ids(&activities), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_by_description_is_lexicographic() {
        let mut activities = vec![
            make_activity(1, "eat", 1, 0.0),
            make_activity(2, "buy", 1, 0.0),
            make_activity(3, "Cook", 1, 0.0),
        ];
        sort_activities(&mut activities, SortField::Description);
        // Uppercase sorts before lowercase
        assert_eq!(ids(&activities), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_duration() {
        let mut activities = vec![
            make_activity(1, "a", 60, 0.0),
            make_activity(2, "b", 5, 0.0),
            make_activity(3, "c", 20, 0.0),
        ];
        sort_activities(&mut activities, SortField::Duration);
        assert_eq!(ids(&activities), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_start_and_finish() {
        let mut a = make_activity(1, "a", 1, 0.0);
        a.start = Some(make_date(12));
        a.finish = Some(make_date(13));
        let mut b = make_activity(2, "b", 1, 0.0);
        b.start = Some(make_date(9));
        b.finish = Some(make_date(15));
        let c = make_activity(3, "unscheduled", 1, 0.0);

        let mut activities = vec![a, b, c];
        sort_activities(&mut activities, SortField::Start);
        assert_eq!(ids(&activities), vec![3, 2, 1]);
        sort_activities(&mut activities, SortField::Finish);
        assert_eq!(ids(&activities), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_by_cost_ties_keep_order() {
        let mut activities = vec![
            make_activity(4, "d", 1, 10.0),
            make_activity(1, "a", 1, 2.5),
            make_activity(3, "c", 1, 10.0),
            make_activity(2, "b", 1, 2.5),
        ];
        sort_activities(&mut activities, SortField::Cost);
        assert_eq!(ids(&activities), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_sort_by_cost_treats_signed_zero_as_tie() {
        let mut activities = vec![make_activity(1, "a", 1, 0.0), make_activity(2, "b", 1, -0.0)];
        sort_activities(&mut activities, SortField::Cost);
        assert_eq!(ids(&activities), vec![1, 2]);

        let mut activities = vec![make_activity(2, "b", 1, -0.0), make_activity(1, "a", 1, 0.0)];
        sort_activities(&mut activities, SortField::Cost);
        assert_eq!(ids(&activities), vec![2, 1]);
    }

    #[test]
    fn test_sort_borrowed_activities() {
        let owned = vec![make_activity(2, "b", 1, 0.0), make_activity(1, "a", 1, 0.0)];
        let mut borrowed: Vec<&Activity> = owned.iter().collect();
        sort_activities(&mut borrowed, SortField::Id);
        assert_eq!(ids(&borrowed), vec![1, 2]);
        // Owner is untouched
        assert_eq!(ids(&owned), vec![2, 1]);
    }

    #[test]
    fn test_field_from_str() {
        for field in [
            SortField::Id,
            SortField::Description,
            SortField::Duration,
            SortField::Start,
            SortField::Finish,
            SortField::Cost,
        ] {
            assert_eq!(field.as_str().parse::<SortField>(), Ok(field));
        }
        assert_eq!(
            "priority".parse::<SortField>(),
            Err(SortingError::UnknownField("priority".to_string()))
        );
    }

    #[test]
    fn test_order_activities() {
        let map: FxHashMap<ActivityId, Activity> =
            [make_activity(1, "a", 1, 0.0), make_activity(2, "b", 1, 0.0)]
                .into_iter()
                .map(|a| (a.id(), a))
                .collect();
        let ordered = order_activities(&map, &[2, 1]).unwrap();
        assert_eq!(ids(&ordered), vec![2, 1]);
    }

    #[test]
    fn test_order_length_mismatch() {
        let map: FxHashMap<ActivityId, Activity> = [make_activity(1, "a", 1, 0.0)]
            .into_iter()
            .map(|a| (a.id(), a))
            .collect();
        assert_eq!(
            order_activities(&map, &[1, 2]).unwrap_err(),
            SortingError::OrderMismatch {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(
            order_activities(&map, &[5]).unwrap_err(),
            SortingError::ActivityNotFound(5)
        );
    }
}
