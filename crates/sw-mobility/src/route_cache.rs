//! Shared cache of complete searches, keyed by trip rather than by agent.
//!
//! Any agent asking for the same origin, destination, and range gets the
//! same stored path.  Entries are never expired; a path is only as stale as
//! the cost matrix it was computed from, and matrices are invalidated on
//! their own schedule.

use rustc_hash::FxHashMap;
use tracing::trace;

use sw_core::TilePos;
use sw_spatial::CompressedPath;

/// Cache key for a trip: `"{origin}>{destination}~{range}"`.
pub fn route_key(origin: TilePos, destination: TilePos, range: u32) -> String {
    format!("{origin}>{destination}~{range}")
}

/// A stored search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedRoute {
    pub path:       CompressedPath,
    pub incomplete: bool,
}

/// One line of [`RouteCache::listing`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteListing {
    pub key: String,
    pub len: usize,
}

/// Trip-keyed compressed paths plus hit/miss counters.
#[derive(Debug, Default)]
pub struct RouteCache {
    routes: FxHashMap<String, CachedRoute>,
    hits:   u64,
    misses: u64,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, counting the hit or miss.
    pub fn get(&mut self, key: &str) -> Option<&CachedRoute> {
        match self.routes.get(key) {
            Some(route) => {
                self.hits += 1;
                trace!(target: "shardwalk::route_cache", key, len = route.path.len(), "route_cache.hit");
                Some(route)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a complete search.  Incomplete paths are origin-specific and
    /// are refused; returns whether the path was stored.
    pub fn put(&mut self, key: String, path: CompressedPath) -> bool {
        self.insert(key, CachedRoute { path, incomplete: false })
    }

    pub fn insert(&mut self, key: String, route: CachedRoute) -> bool {
        if route.incomplete {
            return false;
        }
        self.routes.insert(key, route);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Keys and path lengths, sorted by key.  For operational visibility.
    pub fn listing(&self) -> Vec<RouteListing> {
        let mut out: Vec<_> = self
            .routes
            .iter()
            .map(|(key, r)| RouteListing { key: key.clone(), len: r.path.len() })
            .collect();
        out.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        out
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
