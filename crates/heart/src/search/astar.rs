//! Best-first search runner and path reconstruction.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::convert::Infallible;
use std::time::Instant;

use crate::graph::{CorridorKind, GraphView, NodeId};

use super::types::{FrontierPolicy, Outcome, SearchCfg, SearchResult};

/// Plan a route from `start` to `goal` with the default `SearchCfg`.
///
/// `cost(from, to, length, kind)` prices one corridor traversal and
/// `heuristic(node, goal)` estimates the remaining cost. Both are called only
/// while this function runs. Absence of a path is reported in the result,
/// never as a panic.
pub fn plan<'a, G, C, H>(
    graph: &'a G,
    cost: C,
    heuristic: H,
    start: &'a str,
    goal: &'a str,
) -> SearchResult
where
    G: GraphView + ?Sized,
    C: FnMut(&str, &str, f64, CorridorKind) -> f64,
    H: FnMut(&str, &str) -> f64,
{
    plan_with_cfg(graph, SearchCfg::default(), cost, heuristic, start, goal)
}

/// `plan` with an explicit configuration.
pub fn plan_with_cfg<'a, G, C, H>(
    graph: &'a G,
    cfg: SearchCfg,
    mut cost: C,
    mut heuristic: H,
    start: &'a str,
    goal: &'a str,
) -> SearchResult
where
    G: GraphView + ?Sized,
    C: FnMut(&str, &str, f64, CorridorKind) -> f64,
    H: FnMut(&str, &str) -> f64,
{
    let res = try_plan_with_cfg::<_, _, _, Infallible>(
        graph,
        cfg,
        |a, b, len, kind| Ok(cost(a, b, len, kind)),
        |n, g| Ok(heuristic(n, g)),
        start,
        goal,
    );
    match res {
        Ok(r) => r,
        Err(never) => match never {},
    }
}

/// Same as `plan` with fallible strategies: the first `Err` from `cost` or
/// `heuristic` aborts the search and is returned as is.
pub fn try_plan<'a, G, C, H, E>(
    graph: &'a G,
    cost: C,
    heuristic: H,
    start: &'a str,
    goal: &'a str,
) -> Result<SearchResult, E>
where
    G: GraphView + ?Sized,
    C: FnMut(&str, &str, f64, CorridorKind) -> Result<f64, E>,
    H: FnMut(&str, &str) -> Result<f64, E>,
{
    try_plan_with_cfg(graph, SearchCfg::default(), cost, heuristic, start, goal)
}

/// `try_plan` with an explicit configuration.
pub fn try_plan_with_cfg<'a, G, C, H, E>(
    graph: &'a G,
    cfg: SearchCfg,
    cost: C,
    heuristic: H,
    start: &'a str,
    goal: &'a str,
) -> Result<SearchResult, E>
where
    G: GraphView + ?Sized,
    C: FnMut(&str, &str, f64, CorridorKind) -> Result<f64, E>,
    H: FnMut(&str, &str) -> Result<f64, E>,
{
    let t0 = Instant::now();
    if !graph.contains(start) || !graph.contains(goal) {
        let mut res = SearchResult::failed(Outcome::InvalidEndpoint);
        res.elapsed = t0.elapsed();
        return Ok(res);
    }
    if start == goal {
        return Ok(SearchResult {
            outcome: Outcome::Found,
            path: Some(vec![start.to_string()]),
            cost: 0.0,
            expanded: 0,
            generated: 0,
            elapsed: t0.elapsed(),
        });
    }
    let mut res = AStarRunner::new(graph, cfg, cost, heuristic, start, goal).run()?;
    res.elapsed = t0.elapsed();
    Ok(res)
}

/// Walk predecessor links back from `goal` to `start` and return the route in
/// forward order. `None` if the chain is broken before reaching `start`.
pub fn reconstruct_path<'a>(
    pred: &HashMap<&'a str, &'a str>,
    start: &str,
    goal: &'a str,
) -> Option<Vec<NodeId>> {
    let mut path = vec![goal.to_string()];
    let mut node = goal;
    while node != start {
        node = *pred.get(node)?;
        path.push(node.to_string());
    }
    path.reverse();
    Some(path)
}

/// Frontier entry ordered as a min-heap on `(f, seq)`.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry<'a> {
    f: f64,
    seq: u64,
    g: f64, // g at push time
    node: &'a str,
}

impl PartialEq for FrontierEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry<'_> {}

impl Ord for FrontierEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap. `seq` is unique, so FIFO on equal `f`.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-call search state; dropped when `run` returns.
struct AStarRunner<'a, G: ?Sized, C, H> {
    graph: &'a G,
    cfg: SearchCfg,
    cost: C,
    heuristic: H,
    start: &'a str,
    goal: &'a str,
    g_cost: HashMap<&'a str, f64>,
    pred: HashMap<&'a str, &'a str>,
    frontier: BinaryHeap<FrontierEntry<'a>>,
    in_frontier: HashSet<&'a str>,
    seq: u64,
    res: SearchResult,
}

impl<'a, G, C, H, E> AStarRunner<'a, G, C, H>
where
    G: GraphView + ?Sized,
    C: FnMut(&str, &str, f64, CorridorKind) -> Result<f64, E>,
    H: FnMut(&str, &str) -> Result<f64, E>,
{
    fn new(
        graph: &'a G,
        cfg: SearchCfg,
        cost: C,
        heuristic: H,
        start: &'a str,
        goal: &'a str,
    ) -> Self {
        Self {
            graph,
            cfg,
            cost,
            heuristic,
            start,
            goal,
            g_cost: HashMap::new(),
            pred: HashMap::new(),
            frontier: BinaryHeap::new(),
            in_frontier: HashSet::new(),
            seq: 0,
            res: SearchResult::pending(),
        }
    }

    fn push(&mut self, node: &'a str, g: f64, f: f64) {
        self.frontier.push(FrontierEntry {
            f,
            seq: self.seq,
            g,
            node,
        });
        self.seq += 1;
        self.in_frontier.insert(node);
    }

    fn run(mut self) -> Result<SearchResult, E> {
        self.g_cost.insert(self.start, 0.0);
        let h0 = (self.heuristic)(self.start, self.goal)?;
        self.push(self.start, 0.0, h0);

        while let Some(FrontierEntry { node: cur, g, .. }) = self.frontier.pop() {
            if self.cfg.frontier == FrontierPolicy::ReinsertOnImprove && g > self.g_cost[cur] {
                continue;
            }
            self.in_frontier.remove(cur);
            self.res.expanded += 1;

            if cur == self.goal {
                self.res.outcome = Outcome::Found;
                self.res.path = reconstruct_path(&self.pred, self.start, self.goal);
                self.res.cost = self.g_cost[cur];
                return Ok(self.res);
            }

            let graph = self.graph;
            let g_cur = self.g_cost[cur];
            for e in graph.neighbors(cur) {
                self.res.generated += 1;
                let next = e.to.as_str();
                let g_next = g_cur + (self.cost)(cur, next, e.length, e.kind)?;
                let improved = self.g_cost.get(next).map_or(true, |&old| g_next < old);
                if !improved {
                    continue;
                }
                self.g_cost.insert(next, g_next);
                let f = g_next + (self.heuristic)(next, self.goal)?;
                let gated = self.cfg.frontier == FrontierPolicy::GateOnMembership
                    && self.in_frontier.contains(next);
                if !gated {
                    self.push(next, g_next, f);
                }
                self.pred.insert(next, cur);
            }
        }
        Ok(self.res)
    }
}
