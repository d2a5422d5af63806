//! JSON graph files and the `--topology` / `--graph` selection.
//!
//! Format:
//! ```json
//! {
//!   "edges": [{"a": "Ingresso", "b": "A", "length": 10.0, "kind": "central"}],
//!   "positions": {"Ingresso": [0.0, 50.0]}
//! }
//! ```

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use heart::api::{complex_graph, complex_positions, simple_graph, CorridorKind, Graph, Positions};
use heart::prelude::Vec2;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Topology {
    Simple,
    Complex,
}

#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Built-in floor plan
    #[arg(long, value_enum, default_value_t = Topology::Complex)]
    pub topology: Topology,
    /// Load the graph from a JSON file instead of a built-in topology
    #[arg(long)]
    pub graph: Option<PathBuf>,
}

impl GraphArgs {
    pub fn load(&self) -> Result<(Graph, Positions)> {
        match (&self.graph, self.topology) {
            (Some(path), _) => load_graph(path),
            (None, Topology::Simple) => Ok((simple_graph(), Positions::new())),
            (None, Topology::Complex) => Ok((complex_graph(), complex_positions())),
        }
    }

    pub fn describe(&self) -> String {
        match &self.graph {
            Some(path) => path.display().to_string(),
            None => format!("{:?}", self.topology).to_lowercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    a: String,
    b: String,
    length: f64,
    #[serde(default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    CorridorKind::Central.to_string()
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    edges: Vec<EdgeRecord>,
    #[serde(default)]
    positions: BTreeMap<String, [f64; 2]>,
}

pub fn load_graph(path: &Path) -> Result<(Graph, Positions)> {
    let bytes = fs::read(path).with_context(|| format!("reading graph {}", path.display()))?;
    parse_graph(&bytes).with_context(|| format!("parsing graph {}", path.display()))
}

fn parse_graph(bytes: &[u8]) -> Result<(Graph, Positions)> {
    let file: GraphFile = serde_json::from_slice(bytes)?;
    let mut graph = Graph::new();
    for (i, e) in file.edges.iter().enumerate() {
        let kind: CorridorKind = e.kind.parse().with_context(|| format!("edge #{i}"))?;
        graph
            .try_add_edge(&e.a, &e.b, e.length, kind)
            .with_context(|| format!("edge #{i}"))?;
    }
    let positions = file
        .positions
        .into_iter()
        .map(|(node, [x, y])| (node, Vec2::new(x, y)))
        .collect();
    Ok((graph, positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heart::api::{length_cost, plan, zero_heuristic};
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "edges": [
            {"a": "lobby", "b": "hall", "length": 4.0, "kind": "central"},
            {"a": "hall", "b": "lab", "length": 6.0, "kind": "isolated"},
            {"a": "lobby", "b": "lab", "length": 12.0}
        ],
        "positions": {"lobby": [0.0, 0.0], "lab": [8.0, 0.0]}
    }"#;

    #[test]
    fn parses_edges_kinds_and_positions() {
        let (g, pos) = parse_graph(SAMPLE.as_bytes()).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edge("lab", "hall"), Some((6.0, CorridorKind::Isolated)));
        assert_eq!(g.edge("lab", "lobby"), Some((12.0, CorridorKind::Central)));
        assert_eq!(pos["lab"], Vec2::new(8.0, 0.0));
        let res = plan(&g, length_cost, zero_heuristic, "lobby", "lab");
        assert_eq!(res.cost, 10.0);
    }

    #[test]
    fn rejects_bad_edges() {
        let bad_kind = r#"{"edges": [{"a": "x", "b": "y", "length": 1.0, "kind": "lobby"}]}"#;
        assert!(parse_graph(bad_kind.as_bytes()).is_err());
        let bad_len = r#"{"edges": [{"a": "x", "b": "y", "length": -1.0}]}"#;
        let err = parse_graph(bad_len.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("non-positive length"));
    }

    #[test]
    fn graph_args_prefer_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.json");
        fs::write(&path, SAMPLE).unwrap();
        let args = GraphArgs {
            topology: Topology::Complex,
            graph: Some(path),
        };
        let (g, _) = args.load().unwrap();
        assert_eq!(g.node_count(), 3);
        let builtin = GraphArgs {
            topology: Topology::Simple,
            graph: None,
        };
        assert_eq!(builtin.load().unwrap().0.edge_count(), 5);
        assert_eq!(builtin.describe(), "simple");
    }
}
