//! Search outcome record.

use std::fmt;
use std::time::Duration;

use crate::graph::NodeId;

/// Why a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Goal reached; `path` and `cost` are populated.
    Found,
    /// Frontier exhausted without reaching the goal.
    Unreachable,
    /// Start or goal is not a node of the graph.
    InvalidEndpoint,
}

impl Outcome {
    #[inline]
    pub fn is_found(self) -> bool {
        self == Outcome::Found
    }
}

/// Result of one `plan` call. Owned by the caller after return.
///
/// On failure `path` is `None` and `cost` is `+inf`; counters hold whatever
/// effort was spent before giving up.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub outcome: Outcome,
    pub path: Option<Vec<NodeId>>,
    /// Accumulated cost under the supplied evaluator (not ground truth).
    pub cost: f64,
    /// Nodes popped from the frontier, including the goal.
    pub expanded: usize,
    /// Edge relaxations attempted, including revisits.
    pub generated: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    pub(crate) fn pending() -> Self {
        Self::failed(Outcome::Unreachable)
    }

    pub(crate) fn failed(outcome: Outcome) -> Self {
        Self {
            outcome,
            path: None,
            cost: f64::INFINITY,
            expanded: 0,
            generated: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[inline]
    pub fn success(&self) -> bool {
        self.outcome.is_found()
    }

    /// Number of nodes on the path (0 on failure).
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }

    /// Compare everything except `elapsed`.
    pub fn same_search(&self, other: &Self) -> bool {
        self.outcome == other.outcome
            && self.path == other.path
            && self.cost.to_bits() == other.cost.to_bits()
            && self.expanded == other.expanded
            && self.generated == other.generated
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(path) = self.path.as_ref().filter(|_| self.success()) else {
            return write!(f, "search failed ({:?}): no path found", self.outcome);
        };
        writeln!(f, "path: {}", path.join(" -> "))?;
        writeln!(f, "estimated cost: {:.2}", self.cost)?;
        writeln!(f, "expanded: {}", self.expanded)?;
        writeln!(f, "generated: {}", self.generated)?;
        write!(f, "time: {:.2}ms", self.elapsed.as_secs_f64() * 1000.0)
    }
}

/// How an improved `g` value reaches the frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrontierPolicy {
    /// A node with a pending entry is not pushed again when its `g` improves;
    /// the pending entry keeps the priority it was pushed with. Cheaper
    /// frontier, but a stale priority can let the goal be popped before a
    /// better route through the pending node is propagated.
    #[default]
    GateOnMembership,
    /// Push a fresh entry on every improvement and skip outdated entries on
    /// pop. Optimal for admissible heuristics and non-negative costs.
    ReinsertOnImprove,
}

/// Search configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchCfg {
    pub frontier: FrontierPolicy,
}

impl SearchCfg {
    pub fn textbook() -> Self {
        Self {
            frontier: FrontierPolicy::ReinsertOnImprove,
        }
    }
}
