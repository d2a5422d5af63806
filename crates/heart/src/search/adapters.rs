//! Reference heuristics and cost evaluators.
//!
//! These fix the closure shapes the engine expects:
//! - cost: `(from, to, length, kind) -> f64`
//! - heuristic: `(node, goal) -> f64`

use std::collections::HashMap;

use crate::graph::{CorridorKind, NodeId, Positions};

/// Walking speed (m/s) assumed by default for the Euclidean heuristic.
pub const DEFAULT_OPTIMISTIC_SPEED: f64 = 2.0;

/// h ≡ 0; turns A* into uniform-cost search.
#[inline]
pub fn zero_heuristic(_node: &str, _goal: &str) -> f64 {
    0.0
}

/// Cost equal to the corridor length.
#[inline]
pub fn length_cost(_from: &str, _to: &str, length: f64, _kind: CorridorKind) -> f64 {
    length
}

/// Straight-line distance to the goal divided by `optimistic_speed`.
///
/// Nodes without coordinates get 0. Admissible only if no corridor is ever
/// traversed faster than `optimistic_speed`; the engine does not check this.
pub fn euclidean_heuristic(
    positions: &Positions,
    optimistic_speed: f64,
) -> impl Fn(&str, &str) -> f64 + '_ {
    move |node: &str, goal: &str| match (positions.get(node), positions.get(goal)) {
        (Some(p), Some(q)) => (q - p).norm() / optimistic_speed,
        _ => 0.0,
    }
}

/// Cost looked up by unordered node pair; falls back to the corridor length.
pub fn static_cost(table: &EdgeCostTable) -> impl Fn(&str, &str, f64, CorridorKind) -> f64 + '_ {
    move |a: &str, b: &str, length: f64, _kind: CorridorKind| table.get(a, b).unwrap_or(length)
}

/// Precomputed cost per undirected corridor. Keys are normalized so that
/// `(a, b)` and `(b, a)` address the same entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeCostTable {
    // lo -> hi -> cost, with lo <= hi
    costs: HashMap<NodeId, HashMap<NodeId, f64>>,
    len: usize,
}

impl EdgeCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn key<'k>(a: &'k str, b: &'k str) -> (&'k str, &'k str) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Insert or replace; returns the previous cost.
    pub fn insert(&mut self, a: &str, b: &str, cost: f64) -> Option<f64> {
        let (lo, hi) = Self::key(a, b);
        let prev = self
            .costs
            .entry(lo.to_string())
            .or_default()
            .insert(hi.to_string(), cost);
        if prev.is_none() {
            self.len += 1;
        }
        prev
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let (lo, hi) = Self::key(a, b);
        self.costs.get(lo)?.get(hi).copied()
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.get(a, b).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries as `(lo, hi, cost)` with `lo <= hi`, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.costs.iter().flat_map(|(lo, row)| {
            row.iter()
                .map(move |(hi, &c)| (lo.as_str(), hi.as_str(), c))
        })
    }
}
