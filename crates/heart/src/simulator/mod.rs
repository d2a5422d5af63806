//! Stochastic traversal-time simulator (ground-truth oracle).
//!
//! Purpose
//! - Manufacture realistic corridor traversal times from length, hour of day,
//!   crowding and corridor kind, with random events and multiplicative noise.
//! - Derive the static per-corridor averages used as the baseline cost table,
//!   and an oracle evaluator for computing true optimal routes.
//!
//! Model
//! - `time = base · hour · crowd(kind) · kind · event · noise`, floored at
//!   `0.9 · base`, where `base = length / mean_speed`.
//! - Reproducibility comes from the simulator's own seeded RNG; the search
//!   engine holds no randomness.

mod factors;
mod oracle;
mod types;

pub use factors::{crowding_factor, effective_crowding, hour_factor, kind_factor};
pub use oracle::{oracle_cost, static_costs, Simulator, DEFAULT_STATIC_SAMPLES};
pub use types::{CongestionModel, SimulatorError, SimulatorParams, TimeStats};
