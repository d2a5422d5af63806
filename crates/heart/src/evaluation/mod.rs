//! Route evaluation against the simulator's ground truth.
//!
//! - `RouteEvaluator` re-costs a planned route with fresh simulated times and
//!   computes the truly optimal route with an oracle search.
//! - `aggregate` and `compare` summarize many trials per configuration;
//!   `win_loss` profiles the conditions under which a candidate wins.

mod aggregate;
mod route;
mod types;

pub use aggregate::{aggregate, compare, win_loss, OPTIMAL_GAP};
pub use route::RouteEvaluator;
pub use types::{
    AggregateMetrics, CaseStats, Comparison, EdgeDetail, EvalError, PathMetrics, Spread, WinLoss,
};

#[cfg(test)]
mod tests;
