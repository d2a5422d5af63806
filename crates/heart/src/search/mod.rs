//! Generalized A* over a corridor graph with pluggable costs and heuristics.
//!
//! Purpose
//! - Find the cheapest start→goal route under an arbitrary edge-cost evaluator
//!   (static table, learned model, simulator oracle) and an arbitrary heuristic.
//! - Report search effort (expanded/generated counts, wall-clock time) next to
//!   the route; these counters are the only observability the engine provides.
//!
//! Semantics worth knowing
//! - With `zero_heuristic` the engine is uniform-cost search (Dijkstra).
//! - Ties on `f` are broken FIFO by an insertion counter, so expansion order is
//!   reproducible for identical inputs.
//! - A node that already has a pending frontier entry is not pushed again when
//!   its `g` improves; `g` and the predecessor still update, and the stale
//!   entry keeps its old priority until popped.
//! - Negative costs are not rejected; optimality then no longer holds.
//! - Strategies are plain closures. `try_plan` takes fallible ones and aborts on
//!   the first error with no partial result.

mod adapters;
mod astar;
mod types;

pub use adapters::{euclidean_heuristic, length_cost, static_cost, zero_heuristic, EdgeCostTable};
pub use adapters::DEFAULT_OPTIMISTIC_SPEED;
pub use astar::{plan, plan_with_cfg, reconstruct_path, try_plan, try_plan_with_cfg};
pub use types::{FrontierPolicy, Outcome, SearchCfg, SearchResult};

#[cfg(test)]
mod tests;
