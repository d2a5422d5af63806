//! Stratified training data drawn from the simulator.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::graph::{CorridorKind, Graph};
use crate::simulator::Simulator;

use super::types::{Dataset, MlError};

/// Default draws per (kind, hour band, crowding level) cell.
pub const DEFAULT_SAMPLES_PER_CELL: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HourBand {
    Night,
    Day,
    Peak,
}

impl HourBand {
    pub const ALL: [HourBand; 3] = [HourBand::Night, HourBand::Day, HourBand::Peak];

    pub fn hours(self) -> &'static [u8] {
        match self {
            Self::Night => &[0, 1, 2, 3, 4, 5, 6, 22, 23],
            Self::Day => &[10, 11, 12, 13, 14, 15, 16],
            Self::Peak => &[7, 8, 9, 17, 18, 19],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrowdingLevel {
    Low,
    Medium,
    High,
}

impl CrowdingLevel {
    pub const ALL: [CrowdingLevel; 3] = [
        CrowdingLevel::Low,
        CrowdingLevel::Medium,
        CrowdingLevel::High,
    ];

    /// Half-open crowding interval `[lo, hi)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Low => (0.0, 0.3),
            Self::Medium => (0.3, 0.7),
            Self::High => (0.7, 1.0),
        }
    }
}

/// Sample every corridor kind present in `graph` uniformly across hour bands
/// and crowding levels, `samples_per_cell` draws per cell, then shuffle.
///
/// Features are `[length, hour, crowding]` with the base (not per-kind)
/// crowding; targets are simulated traversal times. Same seed and simulator
/// state give the same dataset.
pub fn stratified_dataset(
    graph: &Graph,
    sim: &mut Simulator,
    samples_per_cell: usize,
    seed: u64,
) -> Result<Dataset, MlError> {
    let edges = graph.undirected_edges();
    let by_kind: Vec<(CorridorKind, Vec<f64>)> = CorridorKind::ALL
        .iter()
        .map(|&kind| {
            let lengths = edges
                .iter()
                .filter(|e| e.3 == kind)
                .map(|e| e.2)
                .collect::<Vec<_>>();
            (kind, lengths)
        })
        .filter(|(_, lengths)| !lengths.is_empty())
        .collect();
    if by_kind.is_empty() || samples_per_cell == 0 {
        return Err(MlError::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Dataset::new();
    for (kind, lengths) in &by_kind {
        for band in HourBand::ALL {
            for level in CrowdingLevel::ALL {
                let (lo, hi) = level.range();
                for _ in 0..samples_per_cell {
                    let length = lengths[rng.gen_range(0..lengths.len())];
                    let hour = band.hours()[rng.gen_range(0..band.hours().len())];
                    let crowding = rng.gen_range(lo..hi);
                    let time = sim.traversal_time(length, hour, crowding, *kind);
                    data.push([length, f64::from(hour), crowding], time);
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..data.len()).collect();
    order.shuffle(&mut rng);
    Ok(data.select(&order))
}

impl Dataset {
    /// Shuffled train/test split; the test part holds `ceil(len · test_fraction)` rows.
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset), MlError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(MlError::invalid(format!(
                "test_fraction must lie in (0, 1), got {test_fraction}"
            )));
        }
        if self.len() < 2 {
            return Err(MlError::TooFewSamples {
                needed: 2,
                got: self.len(),
            });
        }
        let n_test = ((self.len() as f64 * test_fraction).ceil() as usize).min(self.len() - 1);
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        let (test, train) = order.split_at(n_test);
        Ok((self.select(train), self.select(test)))
    }
}
