use super::*;
use crate::graph;
use crate::search::{length_cost, plan, static_cost, zero_heuristic};
use crate::simulator::{static_costs, Simulator, SimulatorParams};
use std::time::Duration;

fn metrics(label: &str, real: f64, gap: f64, expanded: usize, err: f64) -> PathMetrics {
    PathMetrics {
        label: label.to_string(),
        path: vec!["a".to_string(), "b".to_string()],
        estimated_cost: real + err,
        real_cost: real,
        estimate_error: err,
        relative_error: err / real,
        optimal_cost: real / (1.0 + gap),
        optimality_gap: gap,
        expanded,
        generated: expanded * 2,
        elapsed: Duration::from_millis(2),
        edges: Vec::new(),
    }
}

#[test]
fn real_path_cost_uses_graph_corridors() {
    let g = graph::simple();
    let mut sim = Simulator::new(SimulatorParams::default().noiseless(), 0).unwrap();
    let mut ev = RouteEvaluator::new(&g, &mut sim);
    let path: Vec<String> = ["Ingresso", "B", "C", "Reparto"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    // 10:00, no crowding: secondary corridors cost length / 1.4.
    let (cost, edges) = ev.real_path_cost(&path, 10, 0.0);
    assert!((cost - 24.0 / 1.4).abs() < 1e-9);
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[1].from, "B");
    assert_eq!(edges[1].to, "C");

    // Unknown hop is skipped.
    let broken: Vec<String> = ["Ingresso", "Reparto"].iter().map(|s| s.to_string()).collect();
    let (cost, edges) = ev.real_path_cost(&broken, 10, 0.0);
    assert_eq!(cost, 0.0);
    assert!(edges.is_empty());
}

#[test]
fn path_metrics_compares_estimate_and_optimum() {
    let g = graph::simple();
    let mut sim = Simulator::new(SimulatorParams::default().noiseless(), 0).unwrap();
    let res = plan(&g, length_cost, zero_heuristic, "Ingresso", "Reparto");
    let mut ev = RouteEvaluator::new(&g, &mut sim);
    let (opt_path, opt) = ev.optimal_real("Ingresso", "Reparto", 10, 0.0).unwrap();
    // Empty building at 10:00: central corridors still carry 0.3 crowding and
    // a 1.1 kind factor (1.43 s per 1.4 m); secondary ones are free-flowing.
    assert_eq!(opt_path, ["Ingresso", "B", "C", "Reparto"]);
    assert!((opt - 24.0 / 1.4).abs() < 1e-9);

    let m = ev.path_metrics(&res, "length", opt, 10, 0.0).unwrap();
    let central = 20.0 * 1.43 / 1.4;
    assert_eq!(m.label, "length");
    assert_eq!(m.path, ["Ingresso", "A", "Reparto"]);
    assert!((m.real_cost - central).abs() < 1e-9);
    assert!((m.estimate_error - (central - 20.0)).abs() < 1e-9);
    assert!((m.relative_error - m.estimate_error / m.real_cost).abs() < 1e-12);
    assert!((m.optimality_gap - (central - opt) / opt).abs() < 1e-9);
    assert_eq!(m.expanded, res.expanded);
    assert_eq!(m.edges.len(), 2);
    assert!(m.to_string().starts_with("=== length ==="));
}

#[test]
fn path_metrics_rejects_failed_search() {
    let g = graph::simple();
    let mut sim = Simulator::new(SimulatorParams::default(), 0).unwrap();
    let res = plan(&g, length_cost, zero_heuristic, "Ingresso", "Nowhere");
    let mut ev = RouteEvaluator::new(&g, &mut sim);
    assert_eq!(
        ev.path_metrics(&res, "x", 1.0, 10, 0.5),
        Err(EvalError::NoPath {
            label: "x".to_string()
        })
    );
    assert!(ev.optimal_real("Ingresso", "Nowhere", 10, 0.5).is_none());
}

#[test]
fn zero_optimum_gives_zero_gap() {
    let g = graph::simple();
    let mut sim = Simulator::new(SimulatorParams::default(), 0).unwrap();
    let res = plan(&g, length_cost, zero_heuristic, "A", "A");
    let mut ev = RouteEvaluator::new(&g, &mut sim);
    let m = ev.path_metrics(&res, "trivial", 0.0, 10, 0.5).unwrap();
    assert_eq!(m.real_cost, 0.0);
    assert_eq!(m.relative_error, 0.0);
    assert_eq!(m.optimality_gap, 0.0);
}

#[test]
fn aggregate_summarizes_batch() {
    let batch = [
        metrics("static", 10.0, 0.0, 4, 1.0),
        metrics("static", 20.0, 0.2, 6, 3.0),
        metrics("static", 30.0, 0.005, 8, 2.0),
    ];
    let agg = aggregate(&batch).unwrap();
    assert_eq!(agg.label, "static");
    assert_eq!(agg.trials, 3);
    assert_eq!(agg.real_cost_mean, 20.0);
    assert_eq!(agg.real_cost_min, 10.0);
    assert_eq!(agg.real_cost_max, 30.0);
    assert!((agg.real_cost_std - (200.0f64 / 3.0).sqrt()).abs() < 1e-12);
    assert!((agg.optimal_share - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(agg.gap_max, 0.2);
    assert_eq!(agg.expanded_mean, 6.0);
    assert_eq!(agg.estimate_error_mean, 2.0);
    assert!((agg.elapsed_mean - 0.002).abs() < 1e-12);
    assert!(agg.elapsed_std < 1e-12);
    assert_eq!(aggregate(&[]), Err(EvalError::EmptyBatch));
}

#[test]
fn compare_reports_candidate_savings() {
    let base = [
        metrics("static", 10.0, 0.0, 4, 0.0),
        metrics("static", 20.0, 0.0, 6, 0.0),
    ];
    let cand = [
        metrics("ml", 8.0, 0.0, 4, 0.0),
        metrics("ml", 21.0, 0.0, 3, 0.0),
    ];
    let cmp = compare(&base, &cand).unwrap();
    assert_eq!(cmp.pct_candidate_cheaper, 50.0);
    assert_eq!(cmp.pct_candidate_fewer_expansions, 50.0);
    assert_eq!(cmp.mean_cost_saving, 0.5);
    assert_eq!(cmp.std_cost_saving, 1.5);
    assert_eq!(cmp.mean_expansion_saving, 1.5);
    assert_eq!(
        compare(&base, &cand[..1]),
        Err(EvalError::LengthMismatch {
            baseline: 2,
            candidate: 1
        })
    );
    assert_eq!(compare(&[], &[]), Err(EvalError::EmptyBatch));
}

#[test]
fn win_loss_profiles_winning_conditions() {
    let base = [
        metrics("static", 30.0, 0.0, 4, 0.0),
        metrics("static", 20.0, 0.0, 4, 0.0),
        metrics("static", 10.0, 0.0, 4, 0.0),
        metrics("static", 12.0, 0.0, 4, 0.0),
    ];
    let cand = [
        metrics("ml_rf", 26.0, 0.0, 4, 0.0),
        metrics("ml_rf", 18.0, 0.0, 4, 0.0),
        metrics("ml_rf", 10.0, 0.0, 4, 0.0),
        metrics("ml_rf", 15.0, 0.0, 4, 0.0),
    ];
    let conditions = [(8, 0.9), (18, 0.7), (10, 0.2), (3, 0.4)];
    let wl = win_loss(&base, &cand, &conditions).unwrap();
    assert_eq!(wl.total, 4);

    let wins = wl.wins.unwrap();
    assert_eq!(wins.cases, 2);
    assert_eq!(wins.share, 50.0);
    assert_eq!(wins.margin.mean, 3.0);
    assert_eq!(wins.margin.std, 1.0);
    assert_eq!((wins.hour.min, wins.hour.max), (8.0, 18.0));
    assert!((wins.crowding.mean - 0.8).abs() < 1e-12);

    // The tie at trial 2 is a loss with zero margin.
    let losses = wl.losses.unwrap();
    assert_eq!(losses.cases, 2);
    assert_eq!((losses.margin.min, losses.margin.max), (0.0, 3.0));
    assert_eq!(losses.hour.mean, 6.5);
}

#[test]
fn win_loss_rejects_bad_batches() {
    let base = [metrics("static", 10.0, 0.0, 4, 0.0)];
    let cand = [metrics("ml", 12.0, 0.0, 4, 0.0)];
    let wl = win_loss(&base, &cand, &[(9, 0.5)]).unwrap();
    assert!(wl.wins.is_none());
    assert_eq!(wl.losses.unwrap().share, 100.0);
    assert_eq!(
        win_loss(&base, &cand, &[]),
        Err(EvalError::LengthMismatch {
            baseline: 1,
            candidate: 0
        })
    );
    assert_eq!(win_loss(&[], &[], &[]), Err(EvalError::EmptyBatch));
}

#[test]
fn static_baseline_end_to_end() {
    let g = graph::complex();
    let mut sim = Simulator::new(SimulatorParams::default(), 2024).unwrap();
    let table = static_costs(&g, &mut sim, 50);
    let res = plan(&g, static_cost(&table), zero_heuristic, graph::ENTRANCE, graph::WARD);
    assert!(res.success());
    let mut ev = RouteEvaluator::new(&g, &mut sim);
    let (_, opt) = ev.optimal_real(graph::ENTRANCE, graph::WARD, 9, 0.8).unwrap();
    let m = ev.path_metrics(&res, "static", opt, 9, 0.8).unwrap();
    assert!(m.real_cost > 0.0);
    assert!(m.estimated_cost.is_finite());
    let agg = aggregate(std::slice::from_ref(&m)).unwrap();
    assert_eq!(agg.trials, 1);
    assert_eq!(agg.real_cost_std, 0.0);
}
