use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use heart::api::{
    euclidean_heuristic, length_cost, oracle_cost, plan_with_cfg, static_cost, static_costs,
    zero_heuristic, CongestionModel, CorridorKind, Graph, Outcome, Positions, SearchCfg, SearchResult,
    Simulator, SimulatorParams, DEFAULT_OPTIMISTIC_SPEED, DEFAULT_SAMPLES_PER_CELL, ENTRANCE, WARD,
};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod experiment;
mod graph_file;
mod provenance;

use experiment::{ExperimentSetup, ModelSettings, Scenario};
use graph_file::GraphArgs;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Route planning experiments on hospital floor plans")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Plan one route and print it as JSON
    Plan(PlanArgs),
    /// Compare cost configurations over many simulated conditions
    Experiment(ExperimentArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CostKind {
    /// Corridor length in metres
    Length,
    /// Mean simulated time per corridor, sampled once up front
    Static,
    /// Fresh simulated time at the given hour and crowding
    Oracle,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeuristicKind {
    Zero,
    Euclidean,
}

/// Options shared by every command that plans routes.
#[derive(Args, Debug, Clone)]
struct RouteArgs {
    #[command(flatten)]
    graph: GraphArgs,
    #[arg(long, default_value = ENTRANCE)]
    start: String,
    #[arg(long, default_value = WARD)]
    goal: String,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "linear")]
    congestion: CongestionModel,
    /// Optimistic walking speed (m/s) for the Euclidean heuristic
    #[arg(long, default_value_t = DEFAULT_OPTIMISTIC_SPEED)]
    speed: f64,
    /// Re-push improved frontier nodes (always optimal with an admissible heuristic)
    #[arg(long)]
    textbook: bool,
}

impl RouteArgs {
    fn cfg(&self) -> SearchCfg {
        if self.textbook {
            SearchCfg::textbook()
        } else {
            SearchCfg::default()
        }
    }

    fn params(&self) -> SimulatorParams {
        SimulatorParams {
            congestion: self.congestion,
            ..SimulatorParams::default()
        }
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.speed.is_finite() && self.speed > 0.0,
            "--speed must be finite and > 0, got {}",
            self.speed
        );
        Ok(())
    }

    fn params_json(&self) -> serde_json::Value {
        json!({
            "graph": self.graph.describe(),
            "start": self.start,
            "goal": self.goal,
            "congestion": self.congestion.as_str(),
            "speed": self.speed,
            "textbook": self.textbook,
        })
    }
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    route: RouteArgs,
    #[arg(long, value_enum, default_value_t = CostKind::Static)]
    cost: CostKind,
    #[arg(long, value_enum, default_value_t = HeuristicKind::Zero)]
    heuristic: HeuristicKind,
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(0..24))]
    hour: u8,
    #[arg(long, default_value_t = 0.5)]
    crowding: f64,
    /// Samples per corridor for `--cost static`
    #[arg(long, default_value_t = heart::api::DEFAULT_STATIC_SAMPLES)]
    samples: usize,
    /// Also write the report to this file, with a provenance sidecar
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExperimentArgs {
    #[command(flatten)]
    route: RouteArgs,
    #[arg(long, default_value_t = 50)]
    trials: usize,
    /// CSV with `hour` and `crowding` columns; overrides `--trials`
    #[arg(long)]
    scenarios: Option<PathBuf>,
    #[arg(long, default_value = "data/experiment")]
    out_dir: PathBuf,
    /// Also write the per-trial table as Parquet
    #[arg(long)]
    parquet: bool,
    /// Training draws per (corridor kind, hour band, crowding level) cell
    #[arg(long, default_value_t = DEFAULT_SAMPLES_PER_CELL)]
    samples_per_cell: usize,
    /// Share of the training set held out for test metrics
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,
    /// Random forest size
    #[arg(long, default_value_t = 100)]
    trees: usize,
    /// Random forest depth limit; 0 means unlimited
    #[arg(long, default_value_t = 10)]
    max_depth: usize,
}

impl ExperimentArgs {
    fn models(&self) -> ModelSettings {
        ModelSettings {
            samples_per_cell: self.samples_per_cell,
            test_fraction: self.test_fraction,
            trees: self.trees,
            max_depth: (self.max_depth > 0).then_some(self.max_depth),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanReport {
    outcome: &'static str,
    path: Option<Vec<String>>,
    /// `null` when no route exists.
    cost: Option<f64>,
    expanded: usize,
    generated: usize,
    elapsed_ms: f64,
}

impl From<&SearchResult> for PlanReport {
    fn from(res: &SearchResult) -> Self {
        let outcome = match res.outcome {
            Outcome::Found => "found",
            Outcome::Unreachable => "unreachable",
            Outcome::InvalidEndpoint => "invalid_endpoint",
        };
        Self {
            outcome,
            path: res.path.clone(),
            cost: res.success().then_some(res.cost),
            expanded: res.expanded,
            generated: res.generated,
            elapsed_ms: res.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Plan(args) => plan(args),
        Action::Experiment(args) => run_experiment(args),
        Action::Report => report(),
    }
}

fn search<C>(
    graph: &Graph,
    positions: &Positions,
    route: &RouteArgs,
    heuristic: HeuristicKind,
    cost: C,
) -> SearchResult
where
    C: FnMut(&str, &str, f64, CorridorKind) -> f64,
{
    let cfg = route.cfg();
    match heuristic {
        HeuristicKind::Zero => {
            plan_with_cfg(graph, cfg, cost, zero_heuristic, &route.start, &route.goal)
        }
        HeuristicKind::Euclidean => plan_with_cfg(
            graph,
            cfg,
            cost,
            euclidean_heuristic(positions, route.speed),
            &route.start,
            &route.goal,
        ),
    }
}

fn plan(args: PlanArgs) -> Result<()> {
    let route = &args.route;
    route.check()?;
    ensure!(
        (0.0..=1.0).contains(&args.crowding),
        "--crowding must lie in [0, 1], got {}",
        args.crowding
    );
    let (graph, positions) = route.graph.load()?;
    tracing::info!(
        graph = %route.graph.describe(),
        nodes = graph.node_count(),
        corridors = graph.edge_count(),
        cost = ?args.cost,
        heuristic = ?args.heuristic,
        "plan"
    );
    if matches!(args.heuristic, HeuristicKind::Euclidean) && positions.is_empty() {
        tracing::warn!("no node positions; Euclidean heuristic degrades to zero");
    }

    let mut sim = Simulator::new(route.params(), route.seed)?;
    let res = match args.cost {
        CostKind::Length => search(&graph, &positions, route, args.heuristic, length_cost),
        CostKind::Static => {
            let table = static_costs(&graph, &mut sim, args.samples);
            search(&graph, &positions, route, args.heuristic, static_cost(&table))
        }
        CostKind::Oracle => {
            let cost = oracle_cost(&mut sim, args.hour, args.crowding);
            search(&graph, &positions, route, args.heuristic, cost)
        }
    };
    if res.success() {
        tracing::info!(hops = res.path_len(), cost = res.cost, "route");
    } else {
        tracing::warn!(outcome = ?res.outcome, start = %route.start, goal = %route.goal, "no route");
    }

    let report = serde_json::to_string_pretty(&PlanReport::from(&res))?;
    println!("{report}");
    if let Some(out) = &args.out {
        create_parent(out)?;
        fs::write(out, &report).with_context(|| format!("writing {}", out.display()))?;
        let mut params = route.params_json();
        params["cost"] = json!(format!("{:?}", args.cost).to_lowercase());
        params["heuristic"] = json!(format!("{:?}", args.heuristic).to_lowercase());
        params["hour"] = json!(args.hour);
        params["crowding"] = json!(args.crowding);
        params["samples"] = json!(args.samples);
        provenance::write_sidecar(out, Payload::new("plan", params).with_seed(route.seed))?;
    }
    Ok(())
}

fn run_experiment(args: ExperimentArgs) -> Result<()> {
    let route = &args.route;
    route.check()?;
    let (graph, positions) = route.graph.load()?;
    let scenarios: Vec<Scenario> = match &args.scenarios {
        Some(path) => experiment::read_scenarios(path)?,
        None => experiment::random_scenarios(args.trials, route.seed),
    };
    ensure!(!scenarios.is_empty(), "no scenarios to run");
    tracing::info!(
        graph = %route.graph.describe(),
        trials = scenarios.len(),
        seed = route.seed,
        out_dir = %args.out_dir.display(),
        "experiment"
    );

    let setup = ExperimentSetup {
        graph: &graph,
        positions: &positions,
        start: &route.start,
        goal: &route.goal,
        params: route.params(),
        seed: route.seed,
        speed: route.speed,
        cfg: route.cfg(),
        models: args.models(),
    };
    let outcome = experiment::run(&setup, &scenarios)?;
    if outcome.completed.len() < scenarios.len() {
        tracing::warn!(
            skipped = scenarios.len() - outcome.completed.len(),
            "trials without a reachable goal"
        );
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let mut params = route.params_json();
    params["trials"] = json!(scenarios.len());
    params["scenarios"] = json!(args.scenarios.as_ref().map(|p| p.display().to_string()));
    params["samples_per_cell"] = json!(args.samples_per_cell);
    params["test_fraction"] = json!(args.test_fraction);
    params["trees"] = json!(args.trees);
    params["max_depth"] = json!(setup.models.max_depth);

    let trials_path = args.out_dir.join("trials.csv");
    let mut df = experiment::trials_frame(&outcome)?;
    experiment::write_csv(&mut df, &trials_path)?;
    provenance::write_sidecar(
        &trials_path,
        Payload::new("experiment", params.clone()).with_seed(route.seed),
    )?;
    // Shares the `trials.provenance.json` sidecar with the CSV.
    if args.parquet {
        experiment::write_parquet(&mut df, &args.out_dir.join("trials.parquet"))?;
    }

    let summary_path = args.out_dir.join("summary.json");
    let summary = experiment::summary(&outcome)?;
    fs::write(&summary_path, serde_json::to_vec_pretty(&summary)?)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    provenance::write_sidecar(
        &summary_path,
        Payload::new("experiment", params).with_seed(route.seed),
    )?;
    tracing::info!(rows = df.height(), summary = %summary_path.display(), "experiment_done");
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "heart_version": heart::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
