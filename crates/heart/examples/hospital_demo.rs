//! One planning scenario on the complex hospital floor.
//!
//! Usage:
//!   cargo run -p heart --example hospital_demo -- [seed]
//!
//! Plans Ingresso → Reparto at a random busy hour with (a) static average
//! costs and no heuristic, (b) static costs with the Euclidean heuristic, and
//! (c) raw corridor lengths, then scores each route against the simulator's
//! perfect-information optimum.

use heart::api::{
    complex_graph, complex_positions, euclidean_heuristic, length_cost, plan, static_cost,
    static_costs, zero_heuristic, CongestionModel, RouteEvaluator, Simulator, SimulatorParams,
    DEFAULT_STATIC_SAMPLES, ENTRANCE, WARD,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn main() {
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);
    let graph = complex_graph();
    let pos = complex_positions();
    let params = SimulatorParams {
        congestion: CongestionModel::Quadratic,
        event_probability: 0.10,
        ..Default::default()
    };
    let mut sim = Simulator::new(params, seed).expect("valid simulator params");
    let table = static_costs(&graph, &mut sim, DEFAULT_STATIC_SAMPLES);
    println!(
        "graph: {} nodes, {} corridors; static costs for {} corridors",
        graph.node_count(),
        graph.edge_count(),
        table.len()
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let hour: u8 = rng.gen_range(8..18);
    let crowding: f64 = rng.gen_range(0.70..0.99);
    println!("scenario: {ENTRANCE} -> {WARD} at {hour:02}:00, crowding {:.0}%", crowding * 100.0);

    let runs = [
        (
            "static (h=0)",
            plan(&graph, static_cost(&table), zero_heuristic, ENTRANCE, WARD),
        ),
        (
            "static + euclidean",
            plan(
                &graph,
                static_cost(&table),
                euclidean_heuristic(&pos, 3.5),
                ENTRANCE,
                WARD,
            ),
        ),
        (
            "length",
            plan(&graph, length_cost, zero_heuristic, ENTRANCE, WARD),
        ),
    ];

    let mut ev = RouteEvaluator::new(&graph, &mut sim);
    let (_, optimum) = ev
        .optimal_real(ENTRANCE, WARD, hour, crowding)
        .expect("ward reachable");
    println!("\n{:<20} {:>10} {:>8} {:>6}  path", "config", "real (s)", "gap", "nodes");
    println!("{:<20} {:>10.2} {:>8} {:>6}  (perfect information)", "optimum", optimum, "0.0%", "-");
    for (label, res) in &runs {
        let m = ev
            .path_metrics(res, label, optimum, hour, crowding)
            .expect("route found");
        println!(
            "{:<20} {:>10.2} {:>7.1}% {:>6}  {}",
            label,
            m.real_cost,
            m.optimality_gap * 100.0,
            m.expanded,
            m.path.join(" -> ")
        );
    }
}
