//! Fixed reference topologies of the hospital floor.
//!
//! - `simple`: two routes from the entrance to the ward (short central route,
//!   longer secondary route).
//! - `complex`: 26 nodes; a central spine flanked by secondary and isolated
//!   parallel corridors with cross links.

use nalgebra::Vector2;

use super::types::{CorridorKind, Graph, Positions};

use CorridorKind::{Central, Isolated, Secondary};

pub const ENTRANCE: &str = "Ingresso";
pub const WARD: &str = "Reparto";

/// Entrance–ward graph with one central and one secondary route.
pub fn simple() -> Graph {
    let mut g = Graph::new();
    g.add_edge(ENTRANCE, "A", 10.0, Central);
    g.add_edge("A", WARD, 10.0, Central);
    // Alternative route: longer but usually less crowded.
    g.add_edge(ENTRANCE, "B", 8.0, Secondary);
    g.add_edge("B", "C", 8.0, Secondary);
    g.add_edge("C", WARD, 8.0, Secondary);
    g
}

/// Six parallel entrance–ward corridors plus cross links.
pub fn complex() -> Graph {
    let mut g = Graph::new();
    chain(&mut g, &["A", "B", "C", "D"], 10.0, Central);
    chain(&mut g, &["N1", "N2", "N3", "N4"], 12.0, Secondary);
    chain(&mut g, &["S1", "S2", "S3", "S4"], 12.0, Secondary);
    chain(&mut g, &["E1", "E2", "E3", "E4"], 16.0, Isolated);
    chain(&mut g, &["T1", "T2", "T3", "T4"], 18.0, Isolated);
    chain(&mut g, &["P1", "P2", "P3", "P4"], 18.0, Isolated);

    let links: [(&str, &str, f64, CorridorKind); 21] = [
        ("A", "N1", 8.0, Secondary),
        ("A", "S1", 8.0, Secondary),
        ("B", "N2", 8.0, Secondary),
        ("B", "S2", 8.0, Secondary),
        ("C", "N3", 8.0, Secondary),
        ("C", "S3", 8.0, Secondary),
        ("D", "N4", 8.0, Secondary),
        ("D", "S4", 8.0, Secondary),
        ("N1", "E1", 10.0, Isolated),
        ("S1", "E1", 10.0, Isolated),
        ("C", "E2", 12.0, Isolated),
        ("E1", "T1", 10.0, Isolated),
        ("E1", "P1", 10.0, Isolated),
        ("N2", "T2", 12.0, Isolated),
        ("S2", "P2", 12.0, Isolated),
        ("N2", "S2", 15.0, Secondary),
        ("N3", "E3", 18.0, Isolated),
        ("S3", "E3", 18.0, Isolated),
        ("N1", "N3", 20.0, Central),
        ("S1", "S3", 20.0, Central),
        ("T2", "P2", 20.0, Isolated),
    ];
    for (a, b, len, kind) in links {
        g.add_edge(a, b, len, kind);
    }
    g
}

/// `ENTRANCE – inner[0] – … – inner[n-1] – WARD`, all with the same length and kind.
fn chain(g: &mut Graph, inner: &[&str], length: f64, kind: CorridorKind) {
    let mut prev = ENTRANCE;
    for &node in inner.iter().chain(std::iter::once(&WARD)) {
        g.add_edge(prev, node, length, kind);
        prev = node;
    }
}

/// Metric coordinates for `complex()`: x runs from the entrance (0 m) to the
/// ward (100 m); y is the offset from the central corridor's line at 50 m.
pub fn complex_positions() -> Positions {
    let mut pos = Positions::new();
    pos.insert(ENTRANCE.to_string(), Vector2::new(0.0, 50.0));
    pos.insert(WARD.to_string(), Vector2::new(100.0, 50.0));
    let rows: [(&[&str; 4], f64); 6] = [
        (&["A", "B", "C", "D"], 50.0),
        (&["N1", "N2", "N3", "N4"], 30.0),
        (&["S1", "S2", "S3", "S4"], 70.0),
        (&["E1", "E2", "E3", "E4"], 10.0),
        (&["T1", "T2", "T3", "T4"], -10.0),
        (&["P1", "P2", "P3", "P4"], 90.0),
    ];
    for (names, y) in rows {
        for (i, name) in names.iter().enumerate() {
            let x = 20.0 * (i as f64 + 1.0);
            pos.insert((*name).to_string(), Vector2::new(x, y));
        }
    }
    pos
}
