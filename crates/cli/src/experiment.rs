//! Batch experiment: static baseline, Euclidean-guided static, and the two
//! learned cost models, each scored against the simulator's
//! perfect-information optimum.

use anyhow::{bail, ensure, Context, Result};
use heart::api::{
    aggregate, compare, euclidean_heuristic, learned_cost, plan_with_cfg, static_cost,
    static_costs, stratified_dataset, try_plan_with_cfg, win_loss, zero_heuristic,
    AggregateMetrics, CaseStats, Comparison, CostModel, Dataset, Graph, LinearModel, ModelMetrics,
    PathMetrics, Positions, RandomForest, RouteEvaluator, SearchCfg, Simulator, SimulatorParams,
    Spread, WinLoss, DEFAULT_SAMPLES_PER_CELL, DEFAULT_STATIC_SAMPLES, FEATURE_NAMES,
};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::fs::File;
use std::path::Path;

pub const CONFIGS: [&str; 4] = ["static", "static_euclidean", "ml_linear", "ml_rf"];

/// Learned configurations that get a win/loss breakdown against `static`.
const PROFILED: [&str; 2] = ["ml_linear", "ml_rf"];

/// One test condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
    pub hour: u8,
    pub crowding: f64,
}

/// Busy daytime conditions: hour in 8..18, crowding in [0.70, 0.99).
pub fn random_scenarios(trials: usize, seed: u64) -> Vec<Scenario> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..trials)
        .map(|_| Scenario {
            hour: rng.gen_range(8..18),
            crowding: rng.gen_range(0.70..0.99),
        })
        .collect()
}

/// Read `hour` and `crowding` columns from a CSV file.
pub fn read_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .select([col("hour").cast(DataType::UInt32), col("crowding").cast(DataType::Float64)])
        .collect()
        .with_context(|| format!("reading scenarios {}", path.display()))?;
    let hours = df.column("hour")?.u32()?;
    let crowding = df.column("crowding")?.f64()?;
    hours
        .into_iter()
        .zip(crowding)
        .enumerate()
        .map(|(i, (h, c))| {
            let (Some(h), Some(c)) = (h, c) else {
                bail!("scenario row {i} has missing values");
            };
            ensure!(h <= 23, "scenario row {i}: hour {h} outside 0..=23");
            ensure!(
                (0.0..=1.0).contains(&c),
                "scenario row {i}: crowding {c} outside [0, 1]"
            );
            Ok(Scenario {
                hour: h as u8,
                crowding: c,
            })
        })
        .collect()
}

/// Training settings for the learned configurations.
#[derive(Clone, Copy, Debug)]
pub struct ModelSettings {
    pub samples_per_cell: usize,
    pub test_fraction: f64,
    pub trees: usize,
    pub max_depth: Option<usize>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            samples_per_cell: DEFAULT_SAMPLES_PER_CELL,
            test_fraction: 0.2,
            trees: 100,
            max_depth: Some(10),
        }
    }
}

pub struct ExperimentSetup<'a> {
    pub graph: &'a Graph,
    pub positions: &'a Positions,
    pub start: &'a str,
    pub goal: &'a str,
    pub params: SimulatorParams,
    pub seed: u64,
    pub speed: f64,
    pub cfg: SearchCfg,
    pub models: ModelSettings,
}

/// Fit quality of one trained model.
#[derive(Debug)]
pub struct ModelReport {
    pub config: &'static str,
    pub train: ModelMetrics,
    pub test: ModelMetrics,
    /// Coefficients or feature importances.
    pub detail: Value,
}

#[derive(Debug)]
pub struct ExperimentOutcome {
    /// Per configuration, one entry per completed trial.
    pub metrics: Vec<(&'static str, Vec<PathMetrics>)>,
    /// `(trial index, scenario)` for every trial that produced a route.
    pub completed: Vec<(usize, Scenario)>,
    pub requested: usize,
    pub models: Vec<ModelReport>,
}

fn report(
    config: &'static str,
    model: &dyn CostModel,
    train: &Dataset,
    test: &Dataset,
    detail: Value,
) -> Result<ModelReport> {
    let report = ModelReport {
        config,
        train: model.evaluate(train)?,
        test: model.evaluate(test)?,
        detail,
    };
    tracing::info!(
        config,
        train_r2 = report.train.r2,
        test_r2 = report.test.r2,
        test_mae = report.test.mae,
        "model trained"
    );
    Ok(report)
}

/// Fit both learned models on one stratified dataset drawn from `sim`.
fn train_models(
    setup: &ExperimentSetup<'_>,
    sim: &mut Simulator,
) -> Result<(LinearModel, RandomForest, Vec<ModelReport>)> {
    let settings = setup.models;
    let data = stratified_dataset(setup.graph, sim, settings.samples_per_cell, setup.seed)?;
    let (train, test) = data.split(settings.test_fraction, setup.seed)?;
    tracing::info!(train = train.len(), test = test.len(), "training set");

    let mut linear = LinearModel::new();
    linear.train(&train).context("training linear model")?;
    let coef = linear.coefficients().map(|c| {
        json!({"intercept": c.intercept, "length": c.length, "hour": c.hour, "crowding": c.crowding})
    });
    let linear_report = report("ml_linear", &linear, &train, &test, json!({ "coefficients": coef }))?;

    let mut forest = RandomForest::new(settings.trees).with_seed(setup.seed);
    if let Some(depth) = settings.max_depth {
        forest = forest.with_max_depth(depth);
    }
    forest.train(&train).context("training random forest")?;
    let importances: Option<Value> = forest.feature_importances().map(|imp| {
        FEATURE_NAMES
            .iter()
            .zip(imp)
            .map(|(name, v)| (name.to_string(), json!(v)))
            .collect::<serde_json::Map<_, _>>()
            .into()
    });
    let forest_report = report(
        "ml_rf",
        &forest,
        &train,
        &test,
        json!({ "trees": forest.trees().len(), "feature_importances": importances }),
    )?;
    Ok((linear, forest, vec![linear_report, forest_report]))
}

pub fn run(setup: &ExperimentSetup<'_>, scenarios: &[Scenario]) -> Result<ExperimentOutcome> {
    let mut sim = Simulator::new(setup.params, setup.seed)?;
    tracing::debug!(params = ?sim.params(), seed = setup.seed, "simulator");
    let table = static_costs(setup.graph, &mut sim, DEFAULT_STATIC_SAMPLES);
    tracing::info!(corridors = table.len(), "static_costs");
    let (linear, forest, models) = train_models(setup, &mut sim)?;
    let euclid = euclidean_heuristic(setup.positions, setup.speed);
    let zero = |n: &str, t: &str| Ok(zero_heuristic(n, t));

    let mut metrics: Vec<(&'static str, Vec<PathMetrics>)> =
        CONFIGS.iter().map(|&c| (c, Vec::new())).collect();
    let mut completed = Vec::with_capacity(scenarios.len());
    for (i, sc) in scenarios.iter().enumerate() {
        let (g, s, t, cfg) = (setup.graph, setup.start, setup.goal, setup.cfg);
        let results = [
            plan_with_cfg(g, cfg, static_cost(&table), zero_heuristic, s, t),
            plan_with_cfg(g, cfg, static_cost(&table), &euclid, s, t),
            try_plan_with_cfg(g, cfg, learned_cost(&linear, sc.hour, sc.crowding), zero, s, t)?,
            try_plan_with_cfg(g, cfg, learned_cost(&forest, sc.hour, sc.crowding), zero, s, t)?,
        ];
        let mut ev = RouteEvaluator::new(setup.graph, &mut sim);
        let Some((_, optimum)) = ev.optimal_real(s, t, sc.hour, sc.crowding) else {
            tracing::warn!(trial = i, start = s, goal = t, "goal unreachable; skipping trial");
            continue;
        };
        for ((label, batch), res) in metrics.iter_mut().zip(&results) {
            tracing::debug!(trial = i, config = *label, hops = res.path_len(), "planned");
            let m = ev.path_metrics(res, *label, optimum, sc.hour, sc.crowding)?;
            batch.push(m);
        }
        completed.push((i, *sc));
    }
    Ok(ExperimentOutcome {
        metrics,
        completed,
        requested: scenarios.len(),
        models,
    })
}

/// Long table: one row per (trial, configuration).
pub fn trials_frame(outcome: &ExperimentOutcome) -> PolarsResult<DataFrame> {
    let mut trial = Vec::new();
    let mut label = Vec::new();
    let mut hour = Vec::new();
    let mut crowding = Vec::new();
    let mut estimated = Vec::new();
    let mut real = Vec::new();
    let mut optimal = Vec::new();
    let mut gap = Vec::new();
    let mut expanded = Vec::new();
    let mut generated = Vec::new();
    let mut elapsed_ms = Vec::new();
    let mut path = Vec::new();
    for (name, batch) in &outcome.metrics {
        for (&(i, sc), m) in outcome.completed.iter().zip(batch) {
            trial.push(i as u32);
            label.push(name.to_string());
            hour.push(u32::from(sc.hour));
            crowding.push(sc.crowding);
            estimated.push(m.estimated_cost);
            real.push(m.real_cost);
            optimal.push(m.optimal_cost);
            gap.push(m.optimality_gap);
            expanded.push(m.expanded as u64);
            generated.push(m.generated as u64);
            elapsed_ms.push(m.elapsed.as_secs_f64() * 1000.0);
            path.push(m.path.join(" > "));
        }
    }
    df!(
        "trial" => trial,
        "config" => label,
        "hour" => hour,
        "crowding" => crowding,
        "estimated_cost" => estimated,
        "real_cost" => real,
        "optimal_cost" => optimal,
        "gap" => gap,
        "expanded" => expanded,
        "generated" => generated,
        "elapsed_ms" => elapsed_ms,
        "path" => path
    )
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    ParquetWriter::new(file).finish(df)?;
    Ok(())
}

fn aggregate_json(a: &AggregateMetrics) -> Value {
    json!({
        "config": a.label,
        "trials": a.trials,
        "real_cost": {"mean": a.real_cost_mean, "std": a.real_cost_std, "min": a.real_cost_min, "max": a.real_cost_max},
        "gap": {"mean": a.gap_mean, "std": a.gap_std, "max": a.gap_max},
        "optimal_share": a.optimal_share,
        "expanded": {"mean": a.expanded_mean, "std": a.expanded_std},
        "elapsed_s": {"mean": a.elapsed_mean, "std": a.elapsed_std},
        "estimate_error": {"mean": a.estimate_error_mean, "std": a.estimate_error_std},
    })
}

fn comparison_json(baseline: &str, candidate: &str, c: &Comparison) -> Value {
    json!({
        "baseline": baseline,
        "candidate": candidate,
        "pct_candidate_cheaper": c.pct_candidate_cheaper,
        "pct_candidate_fewer_expansions": c.pct_candidate_fewer_expansions,
        "cost_saving": {"mean": c.mean_cost_saving, "std": c.std_cost_saving},
        "expansion_saving": {"mean": c.mean_expansion_saving, "std": c.std_expansion_saving},
    })
}

fn spread_json(s: &Spread) -> Value {
    json!({"mean": s.mean, "std": s.std, "min": s.min, "max": s.max})
}

fn cases_json(c: Option<&CaseStats>) -> Value {
    match c {
        None => json!({"cases": 0, "share": 0.0}),
        Some(c) => json!({
            "cases": c.cases,
            "share": c.share,
            "crowding": spread_json(&c.crowding),
            "hour": spread_json(&c.hour),
            "margin": spread_json(&c.margin),
        }),
    }
}

fn win_loss_json(baseline: &str, candidate: &str, wl: &WinLoss) -> Value {
    json!({
        "baseline": baseline,
        "candidate": candidate,
        "total": wl.total,
        "wins": cases_json(wl.wins.as_ref()),
        "losses": cases_json(wl.losses.as_ref()),
    })
}

fn model_json(m: &ModelReport) -> Value {
    let fit = |x: &ModelMetrics| json!({"mae": x.mae, "rmse": x.rmse, "r2": x.r2, "mape": x.mape});
    json!({
        "config": m.config,
        "train": fit(&m.train),
        "test": fit(&m.test),
        "detail": m.detail,
    })
}

/// Model fit, aggregates per configuration, comparisons against the static
/// baseline and a win/loss breakdown of the learned configurations.
pub fn summary(outcome: &ExperimentOutcome) -> Result<Value> {
    let mut aggregates = Vec::new();
    for (name, batch) in &outcome.metrics {
        if batch.is_empty() {
            tracing::warn!(config = name, "no completed trials");
            continue;
        }
        aggregates.push(aggregate_json(&aggregate(batch)?));
    }
    let mut comparisons = Vec::new();
    let mut win_losses = Vec::new();
    if let Some((base_name, base)) = outcome.metrics.first().filter(|(_, b)| !b.is_empty()) {
        let conditions: Vec<(u8, f64)> =
            outcome.completed.iter().map(|(_, sc)| (sc.hour, sc.crowding)).collect();
        for (name, batch) in outcome.metrics.iter().skip(1) {
            comparisons.push(comparison_json(base_name, name, &compare(base, batch)?));
            if PROFILED.contains(name) {
                let wl = win_loss(base, batch, &conditions)?;
                win_losses.push(win_loss_json(base_name, name, &wl));
            }
        }
    }
    Ok(json!({
        "requested": outcome.requested,
        "completed": outcome.completed.len(),
        "models": outcome.models.iter().map(model_json).collect::<Vec<_>>(),
        "aggregates": aggregates,
        "comparisons": comparisons,
        "win_loss": win_losses,
    }))
}
