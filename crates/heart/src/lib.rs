//! Shortest-time route planning through a building.
//!
//! The building is an undirected corridor graph; corridor costs and
//! remaining-cost estimates are pluggable closures (static averages, learned
//! models, or the traversal-time simulator), so the same search engine serves
//! every experiment configuration.
//!
//! Modules
//! - `graph`: corridor graph and the reference hospital topologies.
//! - `search`: generalized A* plus the reference heuristics and cost adapters.
//! - `simulator`: seeded traversal-time oracle and static cost tables.
//! - `evaluation`: re-costing routes against the oracle and batch summaries.
//! - `ml`: stratified training data and learned corridor-cost models.

pub mod api;
pub mod evaluation;
pub mod graph;
pub mod ml;
pub mod search;
pub mod simulator;
pub mod stats;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use graph::{CorridorKind, Graph, GraphView, NodeId};
pub use search::{plan, try_plan, SearchResult};

/// Common imports for callers wiring up a search.
pub mod prelude {
    pub use crate::graph::{CorridorKind, Edge, Graph, GraphView, NodeId, Positions};
    pub use crate::search::{
        euclidean_heuristic, length_cost, plan, plan_with_cfg, static_cost, try_plan,
        zero_heuristic, EdgeCostTable, FrontierPolicy, Outcome, SearchCfg, SearchResult,
    };
    pub use nalgebra::Vector2 as Vec2;
}
