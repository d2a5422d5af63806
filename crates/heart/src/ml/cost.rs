//! Evaluator backed by a trained model.

use crate::graph::CorridorKind;
use crate::simulator::effective_crowding;

use super::types::{CostModel, MlError};

/// Corridor cost from `model` at a fixed hour and base crowding.
///
/// Crowding is shifted per corridor kind before querying the model, and the
/// estimate is clamped at 0. Errors (an untrained model) surface through
/// `try_plan`.
pub fn learned_cost<'a, M>(
    model: &'a M,
    hour: u8,
    crowding: f64,
) -> impl Fn(&str, &str, f64, CorridorKind) -> Result<f64, MlError> + 'a
where
    M: CostModel + ?Sized,
{
    move |_: &str, _: &str, length: f64, kind: CorridorKind| {
        model.estimate(length, hour, effective_crowding(crowding, kind))
    }
}
