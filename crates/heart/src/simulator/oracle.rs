//! Seeded simulator plus the cost tables and evaluators derived from it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::graph::{CorridorKind, Graph};
use crate::search::EdgeCostTable;
use crate::stats;

use super::factors::{crowding_factor, hour_factor, kind_factor};
use super::types::{SimulatorError, SimulatorParams, TimeStats};

/// Draws per corridor when building the static baseline table.
pub const DEFAULT_STATIC_SAMPLES: usize = 200;

/// Traversal-time simulator with its own RNG stream.
#[derive(Clone, Debug)]
pub struct Simulator {
    params: SimulatorParams,
    rng: StdRng,
    noise: Normal<f64>,
}

impl Simulator {
    pub fn new(params: SimulatorParams, seed: u64) -> Result<Self, SimulatorError> {
        params.validate()?;
        let noise = Normal::new(1.0, params.noise_std)
            .map_err(|e| SimulatorError::invalid(format!("noise: {e}")))?;
        Ok(Self {
            params,
            rng: StdRng::seed_from_u64(seed),
            noise,
        })
    }

    pub fn params(&self) -> &SimulatorParams {
        &self.params
    }

    fn base_time(&self, length: f64) -> f64 {
        length / self.params.mean_speed
    }

    /// Traversal time without random events or noise.
    pub fn nominal_time(&self, length: f64, hour: u8, crowding: f64, kind: CorridorKind) -> f64 {
        let base = self.base_time(length);
        let t = base
            * hour_factor(hour)
            * crowding_factor(self.params.congestion, crowding, kind)
            * kind_factor(kind);
        t.max(0.9 * base)
    }

    /// One random traversal time in seconds.
    pub fn traversal_time(
        &mut self,
        length: f64,
        hour: u8,
        crowding: f64,
        kind: CorridorKind,
    ) -> f64 {
        let base = self.base_time(length);
        let event = if self.rng.gen::<f64>() < self.params.event_probability {
            let (lo, hi) = self.params.event_magnitude;
            self.rng.gen_range(lo..=hi)
        } else {
            1.0
        };
        let noise = self.noise.sample(&mut self.rng);
        let t = base
            * hour_factor(hour)
            * crowding_factor(self.params.congestion, crowding, kind)
            * kind_factor(kind)
            * event
            * noise;
        t.max(0.9 * base)
    }

    /// Statistics of `samples` draws at random hours (0..=23) and crowding in [0, 1).
    pub fn estimate_mean(&mut self, length: f64, kind: CorridorKind, samples: usize) -> TimeStats {
        let times: Vec<f64> = (0..samples.max(1))
            .map(|_| {
                let hour = self.rng.gen_range(0..=23u8);
                let crowding = self.rng.gen::<f64>();
                self.traversal_time(length, hour, crowding, kind)
            })
            .collect();
        TimeStats {
            mean: stats::mean(&times),
            std: stats::std_dev(&times),
            min: stats::min(&times),
            max: stats::max(&times),
            median: stats::median(&times),
        }
    }
}

/// Mean simulated traversal time per undirected corridor.
///
/// Parallel corridors between the same pair share the first estimate.
pub fn static_costs(graph: &Graph, sim: &mut Simulator, samples: usize) -> EdgeCostTable {
    let mut table = EdgeCostTable::new();
    for (a, b, length, kind) in graph.undirected_edges() {
        if !table.contains(a, b) {
            let stats = sim.estimate_mean(length, kind, samples);
            table.insert(a, b, stats.mean);
        }
    }
    table
}

/// Evaluator drawing a fresh simulated time for every corridor it prices.
pub fn oracle_cost(
    sim: &mut Simulator,
    hour: u8,
    crowding: f64,
) -> impl FnMut(&str, &str, f64, CorridorKind) -> f64 + '_ {
    move |_: &str, _: &str, length: f64, kind: CorridorKind| {
        sim.traversal_time(length, hour, crowding, kind)
    }
}
