//! Dependency graph over activities, with cycle rejection and topological ordering.

use chrono::Duration;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::models::{Activity, ActivityId};

/// Errors that make an activity collection unusable for scheduling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate activity id {0}")]
    DuplicateActivity(ActivityId),
    #[error("activity {from} lists unknown successor {to}")]
    UnknownVertex { from: ActivityId, to: ActivityId },
    #[error("edge {from} -> {to} would create a cycle")]
    Cycle { from: ActivityId, to: ActivityId },
    #[error("activity {0} has a negative duration")]
    NegativeDuration(ActivityId),
    #[error("activity {0} has a negative or non-finite cost")]
    InvalidCost(ActivityId),
}

/// Directed acyclic graph keyed by activity id.
///
/// Edges follow each activity's successor list (id -> successor id). The graph
/// stores ids only; activities stay in the caller's collection. Only a
/// successfully built, acyclic graph can exist.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Vertex ids in ascending order.
    vertices: Vec<ActivityId>,
    successors: FxHashMap<ActivityId, Vec<ActivityId>>,
    /// Topological order computed at build time.
    order: Vec<ActivityId>,
}

impl DependencyGraph {
    /// Build the graph from a collection of activities.
    ///
    /// All vertices and successor references are validated before the graph
    /// is walked. A single depth-first pass then rejects the first back edge
    /// it meets as a cycle and records the topological order.
    pub fn build<'a>(
        activities: impl IntoIterator<Item = &'a Activity>,
    ) -> Result<Self, GraphError> {
        let mut sources: Vec<&Activity> = activities.into_iter().collect();
        sources.sort_by_key(|a| a.id());

        let mut successors: FxHashMap<ActivityId, Vec<ActivityId>> =
            FxHashMap::with_capacity_and_hasher(sources.len(), Default::default());
        for activity in &sources {
            if activity.duration < Duration::zero() {
                return Err(GraphError::NegativeDuration(activity.id()));
            }
            if !activity.cost.is_finite() || activity.cost < 0.0 {
                return Err(GraphError::InvalidCost(activity.id()));
            }
            if successors.insert(activity.id(), Vec::new()).is_some() {
                return Err(GraphError::DuplicateActivity(activity.id()));
            }
        }

        for activity in &sources {
            for &succ in activity.successors() {
                if !successors.contains_key(&succ) {
                    return Err(GraphError::UnknownVertex {
                        from: activity.id(),
                        to: succ,
                    });
                }
            }
        }
        for activity in &sources {
            successors.insert(activity.id(), activity.successors().to_vec());
        }

        let mut graph = Self {
            vertices: sources.iter().map(|a| a.id()).collect(),
            successors,
            order: Vec::new(),
        };
        graph.order = graph.depth_first_order()?;
        Ok(graph)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, id: ActivityId) -> bool {
        self.successors.contains_key(&id)
    }

    /// Successor ids of a vertex, in the order the edges were added.
    pub fn successors(&self, id: ActivityId) -> &[ActivityId] {
        self.successors
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All edges as (from, to) pairs, grouped by ascending source id.
    pub fn edges(&self) -> Vec<(ActivityId, ActivityId)> {
        self.vertices
            .iter()
            .flat_map(|&from| self.successors(from).iter().map(move |&to| (from, to)))
            .collect()
    }

    /// Depth-first topological order.
    ///
    /// Roots are visited in ascending id order and successors in edge order;
    /// the reversed post-order places every vertex before all of its successors.
    pub fn topological_order(&self) -> Vec<ActivityId> {
        self.order.clone()
    }

    /// Iterative three-colour DFS: unvisited, on the stack, or finished.
    ///
    /// An edge into a vertex still on the stack is a back edge and closes a
    /// cycle. Runs in O(V + E).
    fn depth_first_order(&self) -> Result<Vec<ActivityId>, GraphError> {
        let n = self.vertices.len();
        let mut visited: FxHashSet<ActivityId> =
            FxHashSet::with_capacity_and_hasher(n, Default::default());
        let mut on_stack: FxHashSet<ActivityId> =
            FxHashSet::with_capacity_and_hasher(n, Default::default());
        let mut post_order: Vec<ActivityId> = Vec::with_capacity(n);
        // (vertex, index of the next successor to explore)
        let mut stack: Vec<(ActivityId, usize)> = Vec::new();

        for &root in &self.vertices {
            if !visited.insert(root) {
                continue;
            }
            on_stack.insert(root);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (id, next) = *frame;
                let succs = self.successors(id);
                if next < succs.len() {
                    frame.1 += 1;
                    let child = succs[next];
                    if visited.insert(child) {
                        on_stack.insert(child);
                        stack.push((child, 0));
                    } else if on_stack.contains(&child) {
                        return Err(GraphError::Cycle {
                            from: id,
                            to: child,
                        });
                    }
                } else {
                    on_stack.remove(&id);
                    post_order.push(id);
                    stack.pop();
                }
            }
        }

        post_order.reverse();
        Ok(post_order)
    }
}
