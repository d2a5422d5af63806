//! Batch summaries.

use crate::stats::{max, mean, min, std_dev};

use super::types::{AggregateMetrics, CaseStats, Comparison, EvalError, PathMetrics, Spread, WinLoss};

/// Gap below which a route counts as optimal.
pub const OPTIMAL_GAP: f64 = 0.01;

/// Summarize a batch; the label is taken from the first entry.
pub fn aggregate(batch: &[PathMetrics]) -> Result<AggregateMetrics, EvalError> {
    let first = batch.first().ok_or(EvalError::EmptyBatch)?;
    let col = |f: fn(&PathMetrics) -> f64| batch.iter().map(f).collect::<Vec<f64>>();
    let real = col(|m| m.real_cost);
    let gaps = col(|m| m.optimality_gap);
    let expanded = col(|m| m.expanded as f64);
    let elapsed = col(|m| m.elapsed.as_secs_f64());
    let errors = col(|m| m.estimate_error);
    let optimal = gaps.iter().filter(|&&g| g < OPTIMAL_GAP).count();
    Ok(AggregateMetrics {
        label: first.label.clone(),
        trials: batch.len(),
        real_cost_mean: mean(&real),
        real_cost_std: std_dev(&real),
        real_cost_min: min(&real),
        real_cost_max: max(&real),
        gap_mean: mean(&gaps),
        gap_std: std_dev(&gaps),
        gap_max: max(&gaps),
        optimal_share: optimal as f64 / batch.len() as f64,
        expanded_mean: mean(&expanded),
        expanded_std: std_dev(&expanded),
        elapsed_mean: mean(&elapsed),
        elapsed_std: std_dev(&elapsed),
        estimate_error_mean: mean(&errors),
        estimate_error_std: std_dev(&errors),
    })
}

/// Pairwise comparison of two equally sized batches run on the same scenarios.
pub fn compare(baseline: &[PathMetrics], candidate: &[PathMetrics]) -> Result<Comparison, EvalError> {
    if baseline.len() != candidate.len() {
        return Err(EvalError::LengthMismatch {
            baseline: baseline.len(),
            candidate: candidate.len(),
        });
    }
    if baseline.is_empty() {
        return Err(EvalError::EmptyBatch);
    }
    let cost_saving: Vec<f64> = baseline
        .iter()
        .zip(candidate)
        .map(|(b, c)| b.real_cost - c.real_cost)
        .collect();
    let expansion_saving: Vec<f64> = baseline
        .iter()
        .zip(candidate)
        .map(|(b, c)| b.expanded as f64 - c.expanded as f64)
        .collect();
    let pct = |xs: &[f64]| 100.0 * xs.iter().filter(|&&x| x > 0.0).count() as f64 / xs.len() as f64;
    Ok(Comparison {
        pct_candidate_cheaper: pct(&cost_saving),
        pct_candidate_fewer_expansions: pct(&expansion_saving),
        mean_cost_saving: mean(&cost_saving),
        std_cost_saving: std_dev(&cost_saving),
        mean_expansion_saving: mean(&expansion_saving),
        std_expansion_saving: std_dev(&expansion_saving),
    })
}

/// Split paired trials into candidate wins (strictly cheaper real cost) and
/// losses, and describe the conditions of each group. `conditions[i]` is the
/// `(hour, crowding)` of trial `i`.
pub fn win_loss(
    baseline: &[PathMetrics],
    candidate: &[PathMetrics],
    conditions: &[(u8, f64)],
) -> Result<WinLoss, EvalError> {
    for other in [candidate.len(), conditions.len()] {
        if other != baseline.len() {
            return Err(EvalError::LengthMismatch {
                baseline: baseline.len(),
                candidate: other,
            });
        }
    }
    if baseline.is_empty() {
        return Err(EvalError::EmptyBatch);
    }
    let (mut wins, mut losses) = (Vec::new(), Vec::new());
    for ((b, c), &(hour, crowding)) in baseline.iter().zip(candidate).zip(conditions) {
        let diff = b.real_cost - c.real_cost;
        if diff > 0.0 {
            wins.push((f64::from(hour), crowding, diff));
        } else {
            losses.push((f64::from(hour), crowding, -diff));
        }
    }
    let total = baseline.len();
    let describe = |cases: &[(f64, f64, f64)]| -> Option<CaseStats> {
        if cases.is_empty() {
            return None;
        }
        let spread = |f: fn(&(f64, f64, f64)) -> f64| {
            let xs: Vec<f64> = cases.iter().map(f).collect();
            Spread {
                mean: mean(&xs),
                std: std_dev(&xs),
                min: min(&xs),
                max: max(&xs),
            }
        };
        Some(CaseStats {
            cases: cases.len(),
            share: 100.0 * cases.len() as f64 / total as f64,
            hour: spread(|c| c.0),
            crowding: spread(|c| c.1),
            margin: spread(|c| c.2),
        })
    };
    Ok(WinLoss {
        total,
        wins: describe(&wins),
        losses: describe(&losses),
    })
}
