//! What to do when a search comes back empty or incomplete.
//!
//! A [`FallbackChain`] is an ordered list of [`FallbackStrategy`] values.
//! The planner offers the failed search to each in turn and takes the first
//! answer.  The default chain is `[AcceptPartial]`.
//!
//! # Built-in strategies
//!
//! | Strategy        | Answer                                                     |
//! |-----------------|------------------------------------------------------------|
//! | `AcceptPartial` | the incomplete path, if there is one                       |
//! | `PushThrough`   | one step straight at the target if that tile is walkable   |
//! | `Idle`          | wait in place this step                                    |

use std::fmt;
use std::sync::Arc;

use sw_core::TilePos;
use sw_spatial::{CompressedPath, WorldMap};

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Inputs a strategy can use.
pub struct FallbackContext<'a> {
    pub position: TilePos,
    pub target:   TilePos,
    /// Incomplete search result, if the search reached anywhere at all.
    pub partial:  Option<&'a CompressedPath>,
    pub world:    &'a WorldMap,
}

/// A strategy's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Follow this (incomplete) path.
    Path(CompressedPath),
    /// Stand still this step.
    Wait,
}

/// One link in a [`FallbackChain`].
///
/// Return `None` to pass to the next strategy.
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, ctx: &FallbackContext<'_>) -> Option<Fallback>;
}

// ── Built-ins ─────────────────────────────────────────────────────────────────

pub struct AcceptPartial;

impl FallbackStrategy for AcceptPartial {
    fn name(&self) -> &'static str {
        "accept_partial"
    }

    fn attempt(&self, ctx: &FallbackContext<'_>) -> Option<Fallback> {
        ctx.partial
            .filter(|p| !p.is_empty())
            .map(|p| Fallback::Path(p.clone()))
    }
}

/// Escorted movement: ignore the search and step directly at the target.
pub struct PushThrough;

impl FallbackStrategy for PushThrough {
    fn name(&self) -> &'static str {
        "push_through"
    }

    fn attempt(&self, ctx: &FallbackContext<'_>) -> Option<Fallback> {
        let dir = ctx.position.direction_to(ctx.target)?;
        ctx.world
            .is_walkable(ctx.position.step(dir))
            .then(|| Fallback::Path(CompressedPath::from_dirs([dir])))
    }
}

pub struct Idle;

impl FallbackStrategy for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn attempt(&self, _ctx: &FallbackContext<'_>) -> Option<Fallback> {
        Some(Fallback::Wait)
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// Ordered strategies, tried until one answers.
#[derive(Clone)]
pub struct FallbackChain {
    steps: Vec<Arc<dyn FallbackStrategy>>,
}

impl FallbackChain {
    /// A chain that never answers; failed searches become `NoPath`.
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a strategy.
    pub fn then<S: FallbackStrategy + 'static>(mut self, strategy: S) -> Self {
        self.steps.push(Arc::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// First answer from the chain, with the name of the strategy that gave it.
    pub fn resolve(&self, ctx: &FallbackContext<'_>) -> Option<(&'static str, Fallback)> {
        self.steps
            .iter()
            .find_map(|s| s.attempt(ctx).map(|f| (s.name(), f)))
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::empty().then(AcceptPartial)
    }
}

impl fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter().map(|s| s.name())).finish()
    }
}
