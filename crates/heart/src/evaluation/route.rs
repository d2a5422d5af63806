//! Ground-truth re-costing of planned routes.

use crate::graph::{Graph, NodeId};
use crate::search::{plan_with_cfg, zero_heuristic, SearchCfg, SearchResult};
use crate::simulator::{oracle_cost, Simulator};

use super::types::{EdgeDetail, EvalError, PathMetrics};

/// Scores routes on `graph` with times drawn from `sim`.
pub struct RouteEvaluator<'a> {
    graph: &'a Graph,
    sim: &'a mut Simulator,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(graph: &'a Graph, sim: &'a mut Simulator) -> Self {
        Self { graph, sim }
    }

    /// Simulated cost of walking `path` at the given hour and crowding.
    ///
    /// Consecutive nodes without a corridor between them are skipped.
    pub fn real_path_cost(
        &mut self,
        path: &[NodeId],
        hour: u8,
        crowding: f64,
    ) -> (f64, Vec<EdgeDetail>) {
        let mut total = 0.0;
        let mut details = Vec::with_capacity(path.len().saturating_sub(1));
        for pair in path.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let Some((length, kind)) = self.graph.edge(from, to) else {
                continue;
            };
            let real_time = self.sim.traversal_time(length, hour, crowding, kind);
            total += real_time;
            details.push(EdgeDetail {
                from: from.clone(),
                to: to.clone(),
                length,
                kind,
                real_time,
            });
        }
        (total, details)
    }

    /// Score one search result against `optimal_cost`.
    pub fn path_metrics(
        &mut self,
        result: &SearchResult,
        label: &str,
        optimal_cost: f64,
        hour: u8,
        crowding: f64,
    ) -> Result<PathMetrics, EvalError> {
        let path = result
            .path
            .as_ref()
            .filter(|_| result.success())
            .ok_or_else(|| EvalError::NoPath {
                label: label.to_string(),
            })?;
        let (real_cost, edges) = self.real_path_cost(path, hour, crowding);
        let estimate_error = (result.cost - real_cost).abs();
        let relative_error = if real_cost > 0.0 {
            estimate_error / real_cost
        } else {
            0.0
        };
        let optimality_gap = if optimal_cost > 0.0 {
            (real_cost - optimal_cost) / optimal_cost
        } else {
            0.0
        };
        Ok(PathMetrics {
            label: label.to_string(),
            path: path.clone(),
            estimated_cost: result.cost,
            real_cost,
            estimate_error,
            relative_error,
            optimal_cost,
            optimality_gap,
            expanded: result.expanded,
            generated: result.generated,
            elapsed: result.elapsed,
            edges,
        })
    }

    /// Best route under perfect information: plan with the simulator as the
    /// evaluator, then re-cost the route with fresh draws. `None` if unreachable.
    pub fn optimal_real(
        &mut self,
        start: &str,
        goal: &str,
        hour: u8,
        crowding: f64,
    ) -> Option<(Vec<NodeId>, f64)> {
        let res = plan_with_cfg(
            self.graph,
            SearchCfg::textbook(),
            oracle_cost(self.sim, hour, crowding),
            zero_heuristic,
            start,
            goal,
        );
        if !res.success() {
            return None;
        }
        let path = res.path?;
        let (real, _) = self.real_path_cost(&path, hour, crowding);
        Some((path, real))
    }
}
