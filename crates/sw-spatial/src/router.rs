//! Routing trait and default weighted A* over the tile grid.
//!
//! # Pluggability
//!
//! `sw-mobility` calls routing via the [`Router`] trait, so applications can
//! swap in their own search (jump-point search, flow fields, a threat-aware
//! planner) without touching the movement engine.  The default
//! [`GridRouter`] is an 8-connected A* that spans as many regions as the
//! search needs, fetching each region's matrix from the cache the first time
//! the frontier reaches it.
//!
//! # Cost units
//!
//! Step cost is the destination tile's matrix value.  The heuristic is the
//! Chebyshev distance left beyond the proximity range, times the plain cost.
//! Ties on `f` go to the node closer to the goal in squared Euclidean terms,
//! then to the lower world coordinate, which straightens paths on open
//! ground and keeps results deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use sw_core::{Direction, RegionId, TilePos};

use crate::cost_matrix::{AgentObstacles, CostMatrix, CostMatrixCache, IMPASSABLE};
use crate::path::CompressedPath;
use crate::terrain::WorldMap;

/// Per-region cost specialization applied to a private clone of the cached
/// matrix before a search uses it.
pub type CostHook = dyn Fn(RegionId, &mut CostMatrix) + Send + Sync;

// ── Request / context / outcome ───────────────────────────────────────────────

/// One search query.
#[derive(Clone, Copy)]
pub struct SearchRequest<'a> {
    pub origin:      TilePos,
    pub destination: TilePos,
    /// Stop once within this Chebyshev range of `destination`.
    pub range:       u32,
    /// Maximum nodes expanded before giving up with a partial result.
    pub max_nodes:   u32,
    /// Regions the search may not enter (the origin's own region excepted).
    pub forbidden:   Option<&'a FxHashSet<RegionId>>,
    pub cost_hook:   Option<&'a CostHook>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(origin: TilePos, destination: TilePos) -> Self {
        Self {
            origin,
            destination,
            range:     1,
            max_nodes: 4_000,
            forbidden: None,
            cost_hook: None,
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u32) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_forbidden(mut self, forbidden: &'a FxHashSet<RegionId>) -> Self {
        self.forbidden = Some(forbidden);
        self
    }

    pub fn with_cost_hook(mut self, hook: &'a CostHook) -> Self {
        self.cost_hook = Some(hook);
        self
    }

    /// `true` if the result depends on more than origin, destination, and
    /// range, and so must not be shared through a route cache.
    pub fn is_caller_specific(&self) -> bool {
        self.cost_hook.is_some() || self.forbidden.is_some_and(|f| !f.is_empty())
    }
}

/// What a search reads from: the world, the shared matrices, and the
/// partition's view of agents that will not yield.
pub struct SearchContext<'a> {
    pub world:     &'a WorldMap,
    pub matrices:  &'a mut CostMatrixCache,
    pub obstacles: &'a dyn AgentObstacles,
}

/// A successful (possibly partial) search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path:       CompressedPath,
    /// The goal range was not reached; `path` leads to the closest node found.
    pub incomplete: bool,
    /// Nodes expanded.
    pub explored:   u32,
    /// Summed step cost of `path` before any region-exit truncation.
    pub cost:       u32,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path search.
///
/// Returns `None` when the best result is zero-length: the goal is
/// unreachable and no step brings the agent closer, or the origin is
/// already within range.
pub trait Router: Send + Sync {
    fn find_path(&self, ctx: &mut SearchContext<'_>, req: &SearchRequest<'_>) -> Option<SearchOutcome>;
}

// ── GridRouter ────────────────────────────────────────────────────────────────

/// Weighted A* over the 8-connected tile grid.
///
/// Returned paths stop right after the first step that enters a region other
/// than the origin's; the next leg is searched from there.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridRouter;

impl Router for GridRouter {
    fn find_path(&self, ctx: &mut SearchContext<'_>, req: &SearchRequest<'_>) -> Option<SearchOutcome> {
        astar(ctx, req)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

type Node = (i32, i32);

/// Lazily loaded, search-local view of region matrices.
struct RegionCosts<'a> {
    world:     &'a WorldMap,
    matrices:  &'a mut CostMatrixCache,
    obstacles: &'a dyn AgentObstacles,
    forbidden: Option<&'a FxHashSet<RegionId>>,
    hook:      Option<&'a CostHook>,
    home:      RegionId,
    loaded:    FxHashMap<RegionId, Option<Arc<CostMatrix>>>,
}

impl RegionCosts<'_> {
    fn load(&mut self, region: RegionId) -> Option<Arc<CostMatrix>> {
        if region != self.home && self.forbidden.is_some_and(|f| f.contains(&region)) {
            return None;
        }
        let base = self.matrices.get(region, self.world, self.obstacles)?;
        match self.hook {
            Some(hook) => {
                let mut m = (*base).clone();
                hook(region, &mut m);
                Some(Arc::new(m))
            }
            None => Some(base),
        }
    }

    /// Cost of stepping onto `tile`, or `None` if it cannot be entered.
    fn step_cost(&mut self, tile: TilePos) -> Option<u32> {
        if !self.loaded.contains_key(&tile.region) {
            let m = self.load(tile.region);
            self.loaded.insert(tile.region, m);
        }
        let m = self.loaded.get(&tile.region)?.as_ref()?;
        match m.at(tile) {
            IMPASSABLE => None,
            c => Some(c.max(1) as u32),
        }
    }
}

fn astar<'a>(ctx: &'a mut SearchContext<'_>, req: &'a SearchRequest<'a>) -> Option<SearchOutcome> {
    let plain = ctx.matrices.costs().plain as u32;
    let (gx, gy) = req.destination.world();

    let cheb = |(x, y): Node| (x - gx).unsigned_abs().max((y - gy).unsigned_abs());
    let h = |n: Node| cheb(n).saturating_sub(req.range) * plain;
    let e2 = |(x, y): Node| {
        let (dx, dy) = ((x - gx) as i64, (y - gy) as i64);
        (dx * dx + dy * dy) as u64
    };

    let mut costs = RegionCosts {
        world:     ctx.world,
        matrices:  &mut *ctx.matrices,
        obstacles: ctx.obstacles,
        forbidden: req.forbidden,
        hook:      req.cost_hook,
        home:      req.origin.region,
        loaded:    FxHashMap::default(),
    };

    let start = req.origin.world();
    let mut g: FxHashMap<Node, u32> = FxHashMap::default();
    let mut parent: FxHashMap<Node, Node> = FxHashMap::default();
    let mut closed: FxHashSet<Node> = FxHashSet::default();

    // Min-heap on (f, distance², node).  Reverse turns BinaryHeap into a min-heap.
    let mut heap: BinaryHeap<Reverse<(u32, u64, Node)>> = BinaryHeap::new();
    g.insert(start, 0);
    heap.push(Reverse((h(start), e2(start), start)));

    // Closest node seen so far: lowest h, then lowest g.
    let mut best = (h(start), 0u32, start);
    let mut explored = 0u32;
    let mut reached = None;

    while let Some(Reverse((_, _, node))) = heap.pop() {
        if !closed.insert(node) {
            continue;
        }
        if cheb(node) <= req.range {
            reached = Some(node);
            break;
        }
        if explored >= req.max_nodes {
            break;
        }
        explored += 1;

        let cost = g.get(&node).copied().unwrap_or(u32::MAX);
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let next = (node.0 + dx as i32, node.1 + dy as i32);
            if closed.contains(&next) {
                continue;
            }
            let Some(step) = costs.step_cost(TilePos::from_world(next.0, next.1)) else {
                continue;
            };
            let ng = cost.saturating_add(step);
            if ng < g.get(&next).copied().unwrap_or(u32::MAX) {
                g.insert(next, ng);
                parent.insert(next, node);
                let hn = h(next);
                if (hn, ng) < (best.0, best.1) {
                    best = (hn, ng, next);
                }
                heap.push(Reverse((ng + hn, e2(next), next)));
            }
        }
    }

    let (target, incomplete) = match reached {
        Some(n) => (n, false),
        None => {
            debug!(
                target: "shardwalk::router",
                origin = %req.origin,
                destination = %req.destination,
                explored,
                budget = req.max_nodes,
                "search.incomplete"
            );
            (best.2, true)
        }
    };

    if target == start {
        return None;
    }

    let mut walk = vec![TilePos::from_world(target.0, target.1)];
    let mut cur = target;
    while let Some(&p) = parent.get(&cur) {
        walk.push(TilePos::from_world(p.0, p.1));
        cur = p;
    }
    walk.reverse();

    let mut path = CompressedPath::from_positions(&walk)?;
    path.truncate_at_region_exit(req.origin);
    let cost = g.get(&target).copied().unwrap_or(0);

    trace!(
        target: "shardwalk::router",
        origin = %req.origin,
        destination = %req.destination,
        len = path.len(),
        explored,
        incomplete,
        "search.done"
    );

    Some(SearchOutcome { path, incomplete, explored, cost })
}
