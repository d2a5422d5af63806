//! Learned corridor costs.
//!
//! Purpose
//! - Build a stratified training set from the simulator (corridor kind ×
//!   hour band × crowding level) and split it into train/test parts.
//! - Fit regressors from `[length, hour, crowding]` to traversal time: a
//!   linear least-squares model and a random forest.
//! - Expose a trained model to the search engine as a fallible evaluator.

mod cost;
mod dataset;
mod forest;
mod linear;
mod types;

pub use cost::learned_cost;
pub use dataset::{stratified_dataset, CrowdingLevel, HourBand, DEFAULT_SAMPLES_PER_CELL};
pub use forest::{RandomForest, TreeNode};
pub use linear::{LinearCoefficients, LinearModel};
pub use types::{CostModel, Dataset, Features, MlError, ModelMetrics, FEATURE_NAMES};
