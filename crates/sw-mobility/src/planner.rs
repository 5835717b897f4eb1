//! Leg planning: route cache first, then search, then the fallback chain.

use rustc_hash::FxHashSet;
use tracing::debug;

use sw_core::{Occupancy, RegionId, TilePos};
use sw_spatial::{
    AgentObstacles, CompressedPath, CostHook, CostMatrix, CostMatrixCache, Router, SearchContext,
    SearchRequest, WorldMap,
};

use crate::fallback::{Fallback, FallbackContext};
use crate::route_cache::{route_key, RouteCache};
use crate::waypoint::MarkerBook;
use crate::MoveOptions;

// ── Environment ───────────────────────────────────────────────────────────────

/// Read-only partition state the engine consults while advancing an agent.
pub struct MoveEnv<'a> {
    pub world:     &'a WorldMap,
    pub markers:   &'a MarkerBook,
    pub obstacles: &'a dyn AgentObstacles,
    pub occupancy: &'a dyn Occupancy,
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Result of planning one leg.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Planned {
    Path {
        path:       CompressedPath,
        incomplete: bool,
        from_cache: bool,
    },
    /// A fallback chose to wait this step.
    Wait,
    /// Nothing to follow.
    Nothing,
}

/// Tiles held by other agents raised to near-impassable, on top of the
/// caller's own hook.
fn avoidance_hook(opts: &MoveOptions, env: &MoveEnv<'_>, origin: TilePos, mark: u8) -> Box<CostHook> {
    let occupied: FxHashSet<TilePos> = env
        .occupancy
        .occupied_tiles()
        .into_iter()
        .filter(|&t| t != origin)
        .collect();
    let user = opts.cost_hook.clone();
    Box::new(move |region: RegionId, m: &mut CostMatrix| {
        if let Some(hook) = &user {
            hook(region, m);
        }
        for t in occupied.iter().filter(|t| t.region == region) {
            if m.get(t.x, t.y) < mark {
                m.set(t.x, t.y, mark);
            }
        }
    })
}

/// Find a path for one leg.
///
/// Shared searches (no cost hook, no forbidden regions, pass-through
/// allowed) populate the route cache, and consult it unless `fresh` is set.
/// A missing or incomplete result is offered to `opts.fallback`.
#[allow(clippy::too_many_arguments)]
pub fn plan_leg<R: Router>(
    router:   &R,
    matrices: &mut CostMatrixCache,
    routes:   &mut RouteCache,
    origin:   TilePos,
    target:   TilePos,
    fresh:    bool,
    opts:     &MoveOptions,
    env:      &MoveEnv<'_>,
) -> Planned {
    let range = opts.proximity_range;
    let avoid = (!opts.allow_pass_through_friendlies)
        .then(|| avoidance_hook(opts, env, origin, matrices.costs().stationary_agent));

    let mut req = SearchRequest::new(origin, target)
        .with_range(range)
        .with_max_nodes(opts.max_search_nodes)
        .with_forbidden(&opts.forbidden_regions);
    if let Some(hook) = avoid.as_deref().or(opts.cost_hook.as_deref()) {
        req = req.with_cost_hook(hook);
    }

    let shared = !req.is_caller_specific();
    let key = route_key(origin, target, range);
    if shared && !fresh {
        if let Some(hit) = routes.get(&key) {
            return Planned::Path { path: hit.path.clone(), incomplete: false, from_cache: true };
        }
    }

    let mut ctx = SearchContext { world: env.world, matrices, obstacles: env.obstacles };
    let outcome = router.find_path(&mut ctx, &req);

    if let Some(out) = &outcome {
        if !out.incomplete {
            if shared {
                routes.put(key, out.path.clone());
            }
            return Planned::Path { path: out.path.clone(), incomplete: false, from_cache: false };
        }
    }

    let fctx = FallbackContext {
        position: origin,
        target,
        partial:  outcome.as_ref().map(|o| &o.path),
        world:    env.world,
    };
    match opts.fallback.resolve(&fctx) {
        Some((strategy, Fallback::Path(path))) => {
            debug!(
                target: "shardwalk::planner",
                %origin,
                dest = %target,
                strategy,
                len = path.len(),
                "plan.fallback"
            );
            Planned::Path { path, incomplete: true, from_cache: false }
        }
        Some((strategy, Fallback::Wait)) => {
            debug!(target: "shardwalk::planner", %origin, dest = %target, strategy, "plan.wait");
            Planned::Wait
        }
        None => Planned::Nothing,
    }
}
