//! Deterministic slowdown factors.

use crate::graph::CorridorKind;

use super::types::CongestionModel;

const THRESHOLD: f64 = 0.6;

/// Time-of-day multiplier. Anything from 22 upwards counts as night.
pub fn hour_factor(hour: u8) -> f64 {
    match hour {
        7..=9 | 17..=19 => 1.4, // rush hours
        12..=14 => 1.2,         // lunch
        0..=6 | 22.. => 0.9,    // night
        _ => 1.0,
    }
}

/// Crowding seen inside a corridor of the given kind: central corridors
/// attract people, isolated ones shed them.
pub fn effective_crowding(crowding: f64, kind: CorridorKind) -> f64 {
    match kind {
        CorridorKind::Central => (crowding + 0.3).min(1.0),
        CorridorKind::Isolated => (crowding - 0.3).max(0.0),
        CorridorKind::Secondary | CorridorKind::Normal => crowding,
    }
}

/// Congestion multiplier for base crowding in a corridor of `kind`.
pub fn crowding_factor(model: CongestionModel, crowding: f64, kind: CorridorKind) -> f64 {
    let c = effective_crowding(crowding, kind);
    match model {
        CongestionModel::Linear => 1.0 + c,
        CongestionModel::Quadratic => 1.0 + 2.5 * c * c,
        CongestionModel::Threshold if c < THRESHOLD => 1.0,
        CongestionModel::Threshold => 1.0 + 2.0 * (c - THRESHOLD) / (1.0 - THRESHOLD),
    }
}

/// Structural multiplier independent of crowding.
pub fn kind_factor(kind: CorridorKind) -> f64 {
    match kind {
        CorridorKind::Central => 1.1,
        CorridorKind::Secondary | CorridorKind::Normal => 1.0,
        CorridorKind::Isolated => 0.95,
    }
}
