//! Curated surface for the experiment runner.
//!
//! Re-exports the pieces an orchestrator needs in one place: topologies,
//! search, simulator, learned costs and evaluation.

// Graph
pub use crate::graph::{
    complex as complex_graph, complex_positions, simple as simple_graph, CorridorKind, Graph,
    GraphError, Positions, ENTRANCE, WARD,
};
// Search
pub use crate::search::{
    euclidean_heuristic, length_cost, plan, plan_with_cfg, static_cost, try_plan_with_cfg,
    zero_heuristic, EdgeCostTable, FrontierPolicy, Outcome, SearchCfg, SearchResult, DEFAULT_OPTIMISTIC_SPEED,
};
// Simulator
pub use crate::simulator::{
    oracle_cost, static_costs, CongestionModel, Simulator, SimulatorError, SimulatorParams,
    DEFAULT_STATIC_SAMPLES,
};
// Learned costs
pub use crate::ml::{
    learned_cost, stratified_dataset, CostModel, Dataset, LinearCoefficients, LinearModel,
    MlError, ModelMetrics, RandomForest, DEFAULT_SAMPLES_PER_CELL, FEATURE_NAMES,
};
// Evaluation
pub use crate::evaluation::{
    aggregate, compare, win_loss, AggregateMetrics, CaseStats, Comparison, EvalError,
    PathMetrics, RouteEvaluator, Spread, WinLoss,
};
