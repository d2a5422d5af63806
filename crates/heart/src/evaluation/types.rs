//! Metric records.

use std::fmt;
use std::time::Duration;

use crate::graph::{CorridorKind, NodeId};

/// One corridor of an evaluated route.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDetail {
    pub from: NodeId,
    pub to: NodeId,
    pub length: f64,
    pub kind: CorridorKind,
    pub real_time: f64,
}

/// Scorecard for one planned route under one cost configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMetrics {
    pub label: String,
    pub path: Vec<NodeId>,
    /// Cost the planner believed in.
    pub estimated_cost: f64,
    /// Simulated cost of actually walking the route.
    pub real_cost: f64,
    pub estimate_error: f64,
    pub relative_error: f64,
    pub optimal_cost: f64,
    /// `(real - optimal) / optimal`.
    pub optimality_gap: f64,
    pub expanded: usize,
    pub generated: usize,
    pub elapsed: Duration,
    pub edges: Vec<EdgeDetail>,
}

impl fmt::Display for PathMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.label)?;
        writeln!(f, "path: {}", self.path.join(" -> "))?;
        writeln!(f, "estimated cost: {:.2}s", self.estimated_cost)?;
        writeln!(f, "real cost: {:.2}s", self.real_cost)?;
        writeln!(
            f,
            "estimate error: {:.2}s ({:.1}%)",
            self.estimate_error,
            self.relative_error * 100.0
        )?;
        writeln!(f, "optimality gap: {:.1}%", self.optimality_gap * 100.0)?;
        writeln!(f, "expanded: {}", self.expanded)?;
        write!(f, "time: {:.2}ms", self.elapsed.as_secs_f64() * 1000.0)
    }
}

/// Summary of many `PathMetrics` sharing a label.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateMetrics {
    pub label: String,
    pub trials: usize,
    pub real_cost_mean: f64,
    pub real_cost_std: f64,
    pub real_cost_min: f64,
    pub real_cost_max: f64,
    pub gap_mean: f64,
    pub gap_std: f64,
    pub gap_max: f64,
    /// Share of trials with gap below `OPTIMAL_GAP`.
    pub optimal_share: f64,
    pub expanded_mean: f64,
    pub expanded_std: f64,
    /// Seconds.
    pub elapsed_mean: f64,
    pub elapsed_std: f64,
    pub estimate_error_mean: f64,
    pub estimate_error_std: f64,
}

impl fmt::Display for AggregateMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} over {} trials ===", self.label, self.trials)?;
        writeln!(
            f,
            "real cost: {:.2} ± {:.2}s",
            self.real_cost_mean, self.real_cost_std
        )?;
        writeln!(
            f,
            "optimality gap: {:.1}% ± {:.1}%",
            self.gap_mean * 100.0,
            self.gap_std * 100.0
        )?;
        writeln!(f, "optimal routes: {:.1}%", self.optimal_share * 100.0)?;
        writeln!(
            f,
            "expanded: {:.1} ± {:.1}",
            self.expanded_mean, self.expanded_std
        )?;
        write!(
            f,
            "estimate error: {:.2} ± {:.2}s",
            self.estimate_error_mean, self.estimate_error_std
        )
    }
}

/// Candidate-vs-baseline comparison over paired trials. Savings are
/// `baseline - candidate`, so positive means the candidate did better.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub pct_candidate_cheaper: f64,
    pub pct_candidate_fewer_expansions: f64,
    pub mean_cost_saving: f64,
    pub std_cost_saving: f64,
    pub mean_expansion_saving: f64,
    pub std_expansion_saving: f64,
}

/// Mean, population std and range of one quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spread {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Conditions and margins of the trials one side of a pairing won.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseStats {
    pub cases: usize,
    /// Percent of all paired trials.
    pub share: f64,
    pub crowding: Spread,
    pub hour: Spread,
    /// Real-cost margin in seconds (saving for wins, penalty for losses).
    pub margin: Spread,
}

/// Where a candidate beats the baseline on real cost and where it does not.
/// Ties count as losses.
#[derive(Clone, Debug, PartialEq)]
pub struct WinLoss {
    pub total: usize,
    pub wins: Option<CaseStats>,
    pub losses: Option<CaseStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// No metrics to aggregate.
    EmptyBatch,
    /// The search result carries no route.
    NoPath { label: String },
    /// Paired comparison over batches of different sizes.
    LengthMismatch { baseline: usize, candidate: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "cannot aggregate an empty batch"),
            Self::NoPath { label } => write!(f, "configuration {label} found no route"),
            Self::LengthMismatch {
                baseline,
                candidate,
            } => write!(
                f,
                "paired comparison needs equal batches (baseline {baseline}, candidate {candidate})"
            ),
        }
    }
}

impl std::error::Error for EvalError {}
