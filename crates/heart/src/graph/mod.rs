//! Undirected corridor graph of a building.
//!
//! Purpose
//! - Store locations (nodes) and corridors (edges with a physical length and a
//!   corridor kind) as symmetric adjacency lists.
//! - Expose the read-only query surface the search engine consumes (`GraphView`).
//!
//! Invariants
//! - Every corridor appears in both endpoints' adjacency lists.
//! - Adjacency order is insertion order; search tie-breaking depends on it.
//! - Nothing here mutates during a search; callers build once and then read.

mod topology;
mod types;

pub use topology::{complex, complex_positions, simple, ENTRANCE, WARD};
pub use types::{CorridorKind, Edge, Graph, GraphError, GraphView, NodeId, Positions};
