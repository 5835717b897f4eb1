//! Per-request movement options.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use sw_core::{MovementConfig, RegionId};
use sw_spatial::CostHook;

use crate::fallback::FallbackChain;

/// How long a computed path is trusted before searching again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseBudget {
    /// Re-search after this many directions have been consumed.
    Steps(u32),
    /// Keep the path until it runs out.
    #[default]
    Full,
}

impl ReuseBudget {
    #[inline]
    pub fn is_spent(self, used: u32) -> bool {
        match self {
            ReuseBudget::Steps(n) => used >= n,
            ReuseBudget::Full => false,
        }
    }
}

/// Options accepted by `move_towards` and friends.
#[derive(Clone)]
pub struct MoveOptions {
    /// Stop once within this Chebyshev range of the target.
    pub proximity_range: u32,

    /// When `false`, friendly agents are routed around instead of negotiated
    /// with.
    pub allow_pass_through_friendlies: bool,

    pub forbidden_regions: FxHashSet<RegionId>,

    pub max_search_nodes: u32,

    pub reuse: ReuseBudget,

    /// Tried in order when a search returns nothing or an incomplete path.
    pub fallback: FallbackChain,

    /// Caller-supplied per-region cost specialization.
    pub cost_hook: Option<Arc<CostHook>>,
}

impl MoveOptions {
    /// Options with the partition's configured defaults.
    pub fn from_config(cfg: &MovementConfig) -> Self {
        Self {
            proximity_range:               cfg.proximity_range as u32,
            allow_pass_through_friendlies: true,
            forbidden_regions:             FxHashSet::default(),
            max_search_nodes:              cfg.max_search_nodes,
            reuse:                         ReuseBudget::Full,
            fallback:                      FallbackChain::default(),
            cost_hook:                     None,
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.proximity_range = range;
        self
    }

    pub fn avoiding_friendlies(mut self) -> Self {
        self.allow_pass_through_friendlies = false;
        self
    }

    pub fn forbid(mut self, region: RegionId) -> Self {
        self.forbidden_regions.insert(region);
        self
    }

    pub fn with_max_nodes(mut self, n: u32) -> Self {
        self.max_search_nodes = n;
        self
    }

    pub fn with_reuse(mut self, reuse: ReuseBudget) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn with_fallback(mut self, chain: FallbackChain) -> Self {
        self.fallback = chain;
        self
    }

    pub fn with_cost_hook(mut self, hook: Arc<CostHook>) -> Self {
        self.cost_hook = Some(hook);
        self
    }
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl fmt::Debug for MoveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveOptions")
            .field("proximity_range", &self.proximity_range)
            .field("allow_pass_through_friendlies", &self.allow_pass_through_friendlies)
            .field("forbidden_regions", &self.forbidden_regions)
            .field("max_search_nodes", &self.max_search_nodes)
            .field("reuse", &self.reuse)
            .field("fallback", &self.fallback)
            .field("cost_hook", &self.cost_hook.is_some())
            .finish()
    }
}
