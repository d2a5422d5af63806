use super::*;
use crate::graph::{self, CorridorKind, Graph, GraphView};
use nalgebra::Vector2;
use proptest::prelude::*;
use std::collections::HashMap;

fn path_of(res: &SearchResult) -> Vec<&str> {
    res.path
        .as_ref()
        .map(|p| p.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// s–a is expensive; s–b–a is cheaper but only discovered while `a` is pending.
fn pending_improvement_graph(with_shortcut: bool) -> Graph {
    let mut g = Graph::new();
    g.add_edge("s", "a", 5.0, CorridorKind::Normal);
    g.add_edge("s", "b", 1.0, CorridorKind::Normal);
    g.add_edge("b", "a", 1.0, CorridorKind::Normal);
    g.add_edge("a", "t", 1.0, CorridorKind::Normal);
    if with_shortcut {
        g.add_edge("s", "t", 4.0, CorridorKind::Normal);
    }
    g
}

#[test]
fn simple_scenario_prefers_central_route() {
    let g = graph::simple();
    let res = plan(&g, length_cost, zero_heuristic, "Ingresso", "Reparto");
    assert!(res.success());
    assert_eq!(path_of(&res), ["Ingresso", "A", "Reparto"]);
    assert_eq!(res.path_len(), 3);
    assert_eq!(res.cost, 20.0);
    // Ingresso, B, A, C, Reparto
    assert_eq!(res.expanded, 5);
    assert_eq!(res.generated, 8);
}

#[test]
fn start_equals_goal_is_trivial() {
    let g = graph::simple();
    let mut calls = 0;
    let res = plan(
        &g,
        |_: &str, _: &str, len: f64, _: CorridorKind| {
            calls += 1;
            len
        },
        zero_heuristic,
        "B",
        "B",
    );
    assert_eq!(res.outcome, Outcome::Found);
    assert_eq!(path_of(&res), ["B"]);
    assert_eq!(res.cost, 0.0);
    assert_eq!((res.expanded, res.generated), (0, 0));
    assert_eq!(calls, 0);
}

#[test]
fn invalid_endpoints_fail_without_searching() {
    let g = graph::simple();
    for (s, t) in [("Nowhere", "Reparto"), ("Ingresso", "Nowhere"), ("X", "X")] {
        let res = plan(&g, length_cost, zero_heuristic, s, t);
        assert!(!res.success());
        assert_eq!(res.outcome, Outcome::InvalidEndpoint);
        assert!(res.path.is_none());
        assert_eq!(res.cost, f64::INFINITY);
        assert_eq!((res.expanded, res.generated), (0, 0));
    }
}

#[test]
fn disconnected_components_are_unreachable() {
    let mut g = Graph::new();
    g.add_edge("a", "b", 1.0, CorridorKind::Central);
    g.add_edge("c", "d", 1.0, CorridorKind::Central);
    let res = plan(&g, length_cost, zero_heuristic, "a", "d");
    assert_eq!(res.outcome, Outcome::Unreachable);
    assert!(res.path.is_none());
    assert_eq!(res.path_len(), 0);
    assert_eq!(res.cost, f64::INFINITY);
    assert_eq!((res.expanded, res.generated), (2, 2));
}

#[test]
fn gated_frontier_keeps_stale_priority() {
    let g = pending_improvement_graph(true);
    let gated = plan(&g, length_cost, zero_heuristic, "s", "t");
    // `a` improves to 2 while pending at priority 5, so the direct s–t entry
    // (priority 4) is popped first.
    assert_eq!(path_of(&gated), ["s", "t"]);
    assert_eq!(gated.cost, 4.0);
    assert_eq!((gated.expanded, gated.generated), (3, 5));

    let textbook = plan_with_cfg(&g, SearchCfg::textbook(), length_cost, zero_heuristic, "s", "t");
    assert_eq!(path_of(&textbook), ["s", "b", "a", "t"]);
    assert_eq!(textbook.cost, 3.0);
    assert_eq!((textbook.expanded, textbook.generated), (4, 8));
}

#[test]
fn gated_frontier_still_updates_predecessor() {
    let g = pending_improvement_graph(false);
    let res = plan(&g, length_cost, zero_heuristic, "s", "t");
    assert_eq!(path_of(&res), ["s", "b", "a", "t"]);
    assert_eq!(res.cost, 3.0);
    assert_eq!((res.expanded, res.generated), (4, 7));
}

#[test]
fn equal_priorities_expand_in_insertion_order() {
    // Two equal-cost routes; FIFO tie-breaking takes the one discovered first.
    let mut g = Graph::new();
    g.add_edge("s", "left", 1.0, CorridorKind::Normal);
    g.add_edge("s", "right", 1.0, CorridorKind::Normal);
    g.add_edge("left", "t", 1.0, CorridorKind::Normal);
    g.add_edge("right", "t", 1.0, CorridorKind::Normal);
    let res = plan(&g, length_cost, zero_heuristic, "s", "t");
    assert_eq!(path_of(&res), ["s", "left", "t"]);

    let mut order = Vec::new();
    plan(
        &g,
        |from: &str, _: &str, len: f64, _: CorridorKind| {
            if order.last().map(String::as_str) != Some(from) {
                order.push(from.to_string());
            }
            len
        },
        zero_heuristic,
        "s",
        "t",
    );
    assert_eq!(order, ["s", "left", "right"]);
}

#[test]
fn complex_topology_heuristic_prunes_expansions() {
    let g = graph::complex();
    let pos = graph::complex_positions();
    let (s, t) = (graph::ENTRANCE, graph::WARD);
    let spine = ["Ingresso", "A", "B", "C", "D", "Reparto"];

    let ucs = plan(&g, length_cost, zero_heuristic, s, t);
    // Max straight-line/length ratio in this layout is 8, so speed 8 is admissible.
    let astar = plan(&g, length_cost, euclidean_heuristic(&pos, 8.0), s, t);
    let greedy = plan(&g, length_cost, euclidean_heuristic(&pos, 2.0), s, t);
    for r in [&ucs, &astar, &greedy] {
        assert_eq!(path_of(r), spine);
        assert_eq!(r.cost, 50.0);
    }
    assert_eq!(ucs.expanded, 21);
    assert_eq!(astar.expanded, 20);
    assert_eq!(greedy.expanded, 6);
    assert!(ucs.expanded >= astar.expanded);
}

#[test]
fn try_plan_propagates_first_error() {
    let g = graph::simple();
    let res: Result<SearchResult, String> = try_plan(
        &g,
        |_: &str, to: &str, len: f64, _: CorridorKind| {
            if to == "C" {
                Err(format!("no estimate for {to}"))
            } else {
                Ok(len)
            }
        },
        |_: &str, _: &str| Ok(0.0),
        "Ingresso",
        "Reparto",
    );
    assert_eq!(res, Err("no estimate for C".to_string()));

    let res: Result<SearchResult, &str> = try_plan(
        &g,
        |_: &str, _: &str, len: f64, _: CorridorKind| Ok(len),
        |_: &str, _: &str| Err("heuristic offline"),
        "Ingresso",
        "Reparto",
    );
    assert_eq!(res, Err("heuristic offline"));
}

#[test]
fn negative_costs_are_not_rejected() {
    let g = graph::simple();
    let res = plan(
        &g,
        |_: &str, _: &str, len: f64, _: CorridorKind| -len,
        zero_heuristic,
        "Ingresso",
        "Reparto",
    );
    assert!(res.success());
    assert!(res.cost < 0.0);
}

#[test]
fn reconstruct_path_walks_predecessors() {
    let pred: HashMap<&str, &str> = [("c", "b"), ("b", "a"), ("x", "y")].into_iter().collect();
    assert_eq!(
        reconstruct_path(&pred, "a", "c"),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert_eq!(reconstruct_path(&pred, "a", "a"), Some(vec!["a".to_string()]));
    assert_eq!(reconstruct_path(&pred, "a", "x"), None);
}

#[test]
fn euclidean_heuristic_scales_and_defaults_to_zero() {
    let mut pos = graph::Positions::new();
    pos.insert("p".to_string(), Vector2::new(0.0, 0.0));
    pos.insert("q".to_string(), Vector2::new(3.0, 4.0));
    let h = euclidean_heuristic(&pos, 2.0);
    assert!((h("p", "q") - 2.5).abs() < 1e-12);
    assert_eq!(h("q", "q"), 0.0);
    assert_eq!(h("p", "missing"), 0.0);
    assert_eq!(h("missing", "q"), 0.0);
}

#[test]
fn static_cost_normalizes_pairs_and_falls_back_to_length() {
    let mut table = EdgeCostTable::new();
    assert!(table.is_empty());
    assert_eq!(table.insert("b", "a", 7.5), None);
    assert_eq!(table.insert("a", "b", 8.0), Some(7.5));
    assert_eq!(table.len(), 1);
    assert!(table.contains("b", "a"));
    let cost = static_cost(&table);
    assert_eq!(cost("a", "b", 1.0, CorridorKind::Central), 8.0);
    assert_eq!(cost("b", "a", 1.0, CorridorKind::Central), 8.0);
    assert_eq!(cost("a", "c", 3.0, CorridorKind::Central), 3.0);
    let entries: Vec<_> = table.iter().collect();
    assert_eq!(entries, [("a", "b", 8.0)]);
}

#[test]
fn search_result_display() {
    let g = graph::simple();
    let res = plan(&g, length_cost, zero_heuristic, "Ingresso", "Reparto");
    let text = res.to_string();
    assert!(text.starts_with("path: Ingresso -> A -> Reparto\nestimated cost: 20.00"));
    let fail = plan(&g, length_cost, zero_heuristic, "Ingresso", "Nowhere");
    assert!(fail.to_string().contains("InvalidEndpoint"));
}

// ---------- randomized graphs ----------

fn node(i: usize) -> String {
    format!("n{i}")
}

fn build(n: usize, edges: &[(usize, usize, u8)]) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(&node(i));
    }
    for &(a, b, w) in edges {
        let (a, b) = (a % n, b % n);
        if a != b {
            g.add_edge(&node(a), &node(b), f64::from(w), CorridorKind::Normal);
        }
    }
    g
}

/// All-pairs shortest distances (Floyd–Warshall).
fn all_pairs(g: &Graph) -> Vec<Vec<f64>> {
    let n = g.node_count();
    let idx: HashMap<&str, usize> = g.nodes().iter().enumerate().map(|(i, s)| (s.as_str(), i)).collect();
    let mut d = vec![vec![f64::INFINITY; n]; n];
    for (i, row) in d.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for (i, name) in g.nodes().iter().enumerate() {
        for e in g.neighbors(name) {
            let j = idx[e.to.as_str()];
            d[i][j] = d[i][j].min(e.length);
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = d[i][k] + d[k][j];
                if via < d[i][j] {
                    d[i][j] = via;
                }
            }
        }
    }
    d
}

/// Cost of `path` using the cheapest parallel corridor between consecutive nodes.
fn walk_cost(g: &Graph, path: &[String]) -> f64 {
    path.windows(2)
        .map(|w| {
            g.neighbors(&w[0])
                .iter()
                .filter(|e| e.to == w[1])
                .map(|e| e.length)
                .fold(f64::INFINITY, f64::min)
        })
        .sum()
}

fn arb_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, u8)>)> {
    (2usize..9).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n, 1u8..=20), 0..(3 * n)),
        )
    })
}

proptest! {
    #[test]
    fn textbook_frontier_is_optimal_with_admissible_heuristic(
        (n, edges) in arb_graph(),
        s in 0usize..9,
        t in 0usize..9,
        quarter in 0u8..=4,
    ) {
        let g = build(n, &edges);
        let d = all_pairs(&g);
        let (s, t) = (s % n, t % n);
        let (sn, tn) = (node(s), node(t));
        let lambda = f64::from(quarter) * 0.25;
        let heur = |v: &str, _: &str| {
            let i: usize = v[1..].parse().unwrap_or(0);
            let h = lambda * d[i][t];
            if h.is_finite() { h } else { 0.0 }
        };
        let zero = plan_with_cfg(&g, SearchCfg::textbook(), length_cost, zero_heuristic, &sn, &tn);
        let informed = plan_with_cfg(&g, SearchCfg::textbook(), length_cost, heur, &sn, &tn);
        let reachable = d[s][t].is_finite();
        // Consistent heuristic, positive weights: informed never pops more.
        prop_assert!(zero.expanded >= informed.expanded);
        prop_assert_eq!(zero.success(), reachable);
        prop_assert_eq!(informed.success(), reachable);
        if reachable {
            prop_assert_eq!(zero.cost, d[s][t]);
            prop_assert_eq!(informed.cost, d[s][t]);
            let path = informed.path.clone().unwrap_or_default();
            prop_assert_eq!(path.first(), Some(&sn));
            prop_assert_eq!(path.last(), Some(&tn));
            prop_assert_eq!(walk_cost(&g, &path), d[s][t]);
        } else {
            prop_assert_eq!(zero.outcome, Outcome::Unreachable);
            prop_assert_eq!(zero.cost, f64::INFINITY);
        }
    }

    #[test]
    fn gated_frontier_returns_a_valid_route(
        (n, edges) in arb_graph(),
        s in 0usize..9,
        t in 0usize..9,
    ) {
        let g = build(n, &edges);
        let d = all_pairs(&g);
        let (s, t) = (s % n, t % n);
        let res = plan(&g, length_cost, zero_heuristic, &node(s), &node(t));
        prop_assert_eq!(res.success(), d[s][t].is_finite());
        if let Some(path) = &res.path {
            prop_assert_eq!(path.first(), Some(&node(s)));
            prop_assert_eq!(path.last(), Some(&node(t)));
            let walked = walk_cost(&g, path);
            prop_assert!(d[s][t] <= walked);
            prop_assert!(walked <= res.cost);
        }
        prop_assert!(res.expanded <= res.generated + 1);
    }

    #[test]
    fn symmetric_costs_give_symmetric_optima(
        (n, edges) in arb_graph(),
        s in 0usize..9,
        t in 0usize..9,
    ) {
        let g = build(n, &edges);
        let (a, b) = (node(s % n), node(t % n));
        let ab = plan_with_cfg(&g, SearchCfg::textbook(), length_cost, zero_heuristic, &a, &b);
        let ba = plan_with_cfg(&g, SearchCfg::textbook(), length_cost, zero_heuristic, &b, &a);
        prop_assert_eq!(ab.cost, ba.cost);
    }

    #[test]
    fn repeated_plans_are_identical(
        (n, edges) in arb_graph(),
        s in 0usize..9,
        t in 0usize..9,
    ) {
        let g = build(n, &edges);
        let (a, b) = (node(s % n), node(t % n));
        let first = plan(&g, length_cost, zero_heuristic, &a, &b);
        let second = plan(&g, length_cost, zero_heuristic, &a, &b);
        prop_assert!(first.same_search(&second));
    }
}
