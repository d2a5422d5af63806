//! Data types for the corridor graph.

use nalgebra::Vector2;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Opaque location identifier.
pub type NodeId = String;

/// Metric 2D coordinates per node (used by the Euclidean heuristic).
pub type Positions = HashMap<NodeId, Vector2<f64>>;

/// Categorical corridor class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorridorKind {
    /// Main thoroughfare; busiest.
    Central,
    Secondary,
    /// Rarely used service corridor.
    Isolated,
    Normal,
}

impl CorridorKind {
    pub const ALL: [CorridorKind; 4] = [
        CorridorKind::Central,
        CorridorKind::Secondary,
        CorridorKind::Isolated,
        CorridorKind::Normal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Secondary => "secondary",
            Self::Isolated => "isolated",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for CorridorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorridorKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GraphError::UnknownCorridorKind {
                name: s.to_string(),
            })
    }
}

/// Adjacency entry: the far endpoint plus corridor attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub length: f64, // metres, > 0
    pub kind: CorridorKind,
}

/// Errors raised while building a graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphError {
    NonPositiveLength { a: NodeId, b: NodeId, length: f64 },
    SelfLoop { node: NodeId },
    UnknownCorridorKind { name: String },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLength { a, b, length } => {
                write!(f, "corridor {a}–{b} has non-positive length {length}")
            }
            Self::SelfLoop { node } => write!(f, "corridor from {node} to itself"),
            Self::UnknownCorridorKind { name } => write!(f, "unknown corridor kind: {name:?}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Read-only query surface consumed by the search engine.
pub trait GraphView {
    /// Incident corridors of `node` in insertion order; empty for unknown nodes.
    fn neighbors(&self, node: &str) -> &[Edge];
    fn contains(&self, node: &str) -> bool;
}

/// Undirected graph with insertion-ordered nodes and adjacency lists.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    order: Vec<NodeId>,
    adj: HashMap<NodeId, Vec<Edge>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` with no corridors; no-op if it already exists.
    pub fn add_node(&mut self, node: &str) {
        if !self.adj.contains_key(node) {
            self.order.push(node.to_string());
            self.adj.insert(node.to_string(), Vec::new());
        }
    }

    /// Insert a corridor in both directions, creating missing endpoints.
    ///
    /// No validation; see `try_add_edge` for the checked variant.
    pub fn add_edge(&mut self, a: &str, b: &str, length: f64, kind: CorridorKind) {
        self.add_node(a);
        self.add_node(b);
        self.push_half(a, b, length, kind);
        self.push_half(b, a, length, kind);
    }

    /// Like `add_edge`, but rejects self-loops and non-positive or non-finite lengths.
    pub fn try_add_edge(
        &mut self,
        a: &str,
        b: &str,
        length: f64,
        kind: CorridorKind,
    ) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop {
                node: a.to_string(),
            });
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(GraphError::NonPositiveLength {
                a: a.to_string(),
                b: b.to_string(),
                length,
            });
        }
        self.add_edge(a, b, length, kind);
        Ok(())
    }

    fn push_half(&mut self, from: &str, to: &str, length: f64, kind: CorridorKind) {
        if let Some(list) = self.adj.get_mut(from) {
            list.push(Edge {
                to: to.to_string(),
                length,
                kind,
            });
        }
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of undirected corridors.
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(Vec::len).sum::<usize>() / 2
    }

    /// First corridor between `a` and `b` as `(length, kind)`.
    pub fn edge(&self, a: &str, b: &str) -> Option<(f64, CorridorKind)> {
        self.neighbors(a)
            .iter()
            .find(|e| e.to == b)
            .map(|e| (e.length, e.kind))
    }

    /// Each undirected corridor once, as `(a, b, length, kind)`, in node insertion order.
    ///
    /// A corridor is reported from the endpoint inserted first.
    pub fn undirected_edges(&self) -> Vec<(&str, &str, f64, CorridorKind)> {
        let rank: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        let mut out = Vec::with_capacity(self.edge_count());
        for (ra, a) in self.order.iter().enumerate() {
            for e in self.neighbors(a) {
                if rank.get(e.to.as_str()).is_some_and(|&rb| rb > ra) {
                    out.push((a.as_str(), e.to.as_str(), e.length, e.kind));
                }
            }
        }
        out
    }
}

impl GraphView for Graph {
    fn neighbors(&self, node: &str) -> &[Edge] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn contains(&self, node: &str) -> bool {
        self.adj.contains_key(node)
    }
}
