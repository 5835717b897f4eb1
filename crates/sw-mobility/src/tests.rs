//! Unit tests for sw-mobility.

#[cfg(test)]
mod helpers {
    use rustc_hash::FxHashMap;

    use sw_core::{AgentId, MovementConfig, Occupancy, RegionId, TilePos};
    use sw_spatial::{AgentObstacles, GridRouter, RegionMap, WorldMap};

    use crate::{Journey, MarkerBook, MoveEnv, MoveOptions, MovementEngine, NextStep};

    pub const HOME: RegionId = RegionId::new(0, 0);

    pub fn t(x: u8, y: u8) -> TilePos {
        TilePos::new(HOME, x, y)
    }

    pub fn flat_world() -> WorldMap {
        WorldMap::new().with_region(RegionMap::plain(HOME)).unwrap()
    }

    pub fn engine() -> MovementEngine<GridRouter> {
        MovementEngine::new(GridRouter, &MovementConfig::default())
    }

    /// Agents standing still; every one of them refuses to yield.
    #[derive(Default)]
    pub struct Crowd(pub FxHashMap<TilePos, AgentId>);

    impl Crowd {
        pub fn with(mut self, tile: TilePos, agent: u32) -> Self {
            self.0.insert(tile, AgentId(agent));
            self
        }
    }

    impl Occupancy for Crowd {
        fn occupant(&self, tile: TilePos) -> Option<AgentId> {
            self.0.get(&tile).copied()
        }

        fn occupied_tiles(&self) -> Vec<TilePos> {
            let mut v: Vec<_> = self.0.keys().copied().collect();
            v.sort();
            v
        }
    }

    impl AgentObstacles for Crowd {
        fn stationary_tiles(&self, region: RegionId) -> Vec<TilePos> {
            self.occupied_tiles().into_iter().filter(|t| t.region == region).collect()
        }
    }

    pub fn env<'a>(world: &'a WorldMap, book: &'a MarkerBook, crowd: &'a Crowd) -> MoveEnv<'a> {
        MoveEnv { world, markers: book, obstacles: crowd, occupancy: crowd }
    }

    /// Apply every move until the engine reports something else.
    pub fn walk(
        engine: &mut MovementEngine<GridRouter>,
        agent: AgentId,
        mut pos: TilePos,
        journey: &Journey,
        opts: &MoveOptions,
        env: &MoveEnv<'_>,
        max_steps: usize,
    ) -> (TilePos, NextStep, usize) {
        for n in 0..max_steps {
            match engine.advance(agent, pos, journey.clone(), opts, env) {
                NextStep::Move(d) => pos = pos.step(d),
                other => return (pos, other, n),
            }
        }
        panic!("agent {agent} still walking after {max_steps} steps at {pos}");
    }
}

// ── Route cache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route_cache {
    use sw_spatial::CompressedPath;

    use super::helpers::*;
    use crate::{route_key, CachedRoute, RouteCache};

    #[test]
    fn key_format() {
        assert_eq!(route_key(t(10, 10), t(40, 10), 1), "E0S0:10:10>E0S0:40:10~1");
    }

    #[test]
    fn hit_and_miss_counters() {
        let mut cache = RouteCache::new();
        let key = route_key(t(1, 1), t(5, 1), 1);
        assert!(cache.get(&key).is_none());
        assert!(cache.put(key.clone(), "333".parse().unwrap()));
        assert_eq!(cache.get(&key).unwrap().path.len(), 3);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn incomplete_routes_refused() {
        let mut cache = RouteCache::new();
        let route = CachedRoute { path: CompressedPath::from_dirs([]), incomplete: true };
        assert!(!cache.insert("k".into(), route));
        assert!(cache.is_empty());
    }

    #[test]
    fn listing_sorted_by_key() {
        let mut cache = RouteCache::new();
        cache.put("b".into(), "33".parse().unwrap());
        cache.put("a".into(), "1".parse().unwrap());
        let listing = cache.listing();
        assert_eq!(listing.len(), 2);
        assert_eq!((listing[0].key.as_str(), listing[0].len), ("a", 1));
        assert_eq!((listing[1].key.as_str(), listing[1].len), ("b", 2));
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}

// ── Markers & journeys ────────────────────────────────────────────────────────

#[cfg(test)]
mod waypoint {
    use std::collections::VecDeque;

    use super::helpers::*;
    use crate::{next_marker_name, Journey, MarkerBook};

    #[test]
    fn auto_increment_names() {
        assert_eq!(next_marker_name("flag1"), "flag2");
        assert_eq!(next_marker_name("flag9"), "flag10");
        assert_eq!(next_marker_name("w099"), "w100");
        assert_eq!(next_marker_name("route"), "route1");
        assert_eq!(next_marker_name("7"), "8");
    }

    #[test]
    fn successor_prefers_explicit_link() {
        let mut book = MarkerBook::new();
        book.place_linked("a", t(1, 1), "z");
        book.place("a1", t(2, 2));
        book.place("z", t(3, 3));
        assert_eq!(book.successor("a").as_deref(), Some("z"));
        assert_eq!(book.successor("z"), None, "z1 does not exist");
        assert_eq!(book.successor("missing"), None);
    }

    #[test]
    fn marker_journey_follows_chain() {
        let mut book = MarkerBook::new();
        book.place("p1", t(1, 1));
        book.place("p2", t(2, 2));
        let mut j = Journey::markers("p1");
        assert_eq!(j.leg_target(&book), Some(t(1, 1)));
        assert!(j.next_leg(&book));
        assert_eq!(j.leg_target(&book), Some(t(2, 2)));
        assert!(!j.next_leg(&book));
    }

    #[test]
    fn waypoint_suffix_continues() {
        let all: VecDeque<_> = [t(1, 1), t(2, 2), t(3, 3)].into_iter().collect();
        let mut j = Journey::Waypoints(all.clone());
        assert!(j.continues(&Journey::Waypoints(all.clone())));
        assert!(j.next_leg(&crate::MarkerBook::new()));
        assert!(j.continues(&Journey::Waypoints(all)));
        let other: VecDeque<_> = [t(9, 9)].into_iter().collect();
        assert!(!j.continues(&Journey::Waypoints(other)));
        assert!(!j.continues(&Journey::Direct(t(3, 3))));
    }
}

// ── Fallback chain ────────────────────────────────────────────────────────────

#[cfg(test)]
mod fallback {
    use sw_spatial::{CompressedPath, RegionMapBuilder, Terrain, WorldMap};

    use super::helpers::*;
    use crate::{
        AcceptPartial, Fallback, FallbackChain, FallbackContext, FallbackStrategy, Idle, PushThrough,
    };

    #[test]
    fn default_is_accept_partial() {
        assert_eq!(format!("{:?}", FallbackChain::default()), "[\"accept_partial\"]");
    }

    #[test]
    fn first_answer_wins() {
        let world = flat_world();
        let partial: CompressedPath = "33".parse().unwrap();
        let ctx = FallbackContext { position: t(1, 1), target: t(9, 1), partial: Some(&partial), world: &world };
        let chain = FallbackChain::empty().then(AcceptPartial).then(Idle);
        let (name, answer) = chain.resolve(&ctx).unwrap();
        assert_eq!(name, "accept_partial");
        assert_eq!(answer, Fallback::Path(partial.clone()));

        let ctx = FallbackContext { partial: None, ..ctx };
        assert_eq!(chain.resolve(&ctx).unwrap().0, "idle");
        assert!(FallbackChain::empty().resolve(&ctx).is_none());
    }

    #[test]
    fn push_through_needs_walkable_step() {
        let world = WorldMap::new()
            .with_region(RegionMapBuilder::new(HOME).terrain(2, 1, Terrain::Wall).build())
            .unwrap();
        let blocked = FallbackContext { position: t(1, 1), target: t(9, 1), partial: None, world: &world };
        assert!(PushThrough.attempt(&blocked).is_none());

        let open = FallbackContext { position: t(1, 1), target: t(1, 9), partial: None, world: &world };
        assert_eq!(
            PushThrough.attempt(&open),
            Some(Fallback::Path("5".parse().unwrap()))
        );
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use std::collections::VecDeque;

    use super::helpers::*;
    use crate::{Journey, PathState, PersistedPathState};

    #[test]
    fn persisted_json_shape() {
        let mut s = PathState::new(Journey::Direct(t(40, 10)), t(10, 10));
        s.path = "333".parse().unwrap();
        s.target_fingerprint = Some("E0S0:40:10~1".into());
        s.previous_position = Some(t(9, 10));

        let json = serde_json::to_value(s.to_persisted()).unwrap();
        assert_eq!(json["path"], "333");
        assert_eq!(json["targetFingerprint"], "E0S0:40:10~1");
        assert_eq!(json["previousPosition"], "E0S0:9:10");
        assert!(json.get("nextMarkerName").is_none());

        let back: PersistedPathState = serde_json::from_value(json).unwrap();
        assert_eq!(back.into_state().unwrap(), s);
    }

    #[test]
    fn journeys_survive_round_trip() {
        let waypoints: VecDeque<_> = [t(5, 5), t(6, 6)].into_iter().collect();
        for journey in [Journey::Waypoints(waypoints), Journey::markers("flag3")] {
            let s = PathState::new(journey, t(1, 1));
            let text = serde_json::to_string(&s.to_persisted()).unwrap();
            let back: PersistedPathState = serde_json::from_str(&text).unwrap();
            assert_eq!(back.into_state().unwrap(), s);
        }
    }

    #[test]
    fn marker_name_alone_is_accepted() {
        let json = r#"{"path":"","expected":"E0S0:1:1","nextMarkerName":"flag2"}"#;
        let back: PersistedPathState = serde_json::from_str(json).unwrap();
        let s = back.into_state().unwrap();
        assert_eq!(s.journey, Journey::Markers { chain: "flag2".into(), current: "flag2".into() });
    }

    #[test]
    fn conflicting_journeys_rejected() {
        let json = r#"{"path":"3","expected":"E0S0:1:1","target":"E0S0:5:5","nextMarkerName":"a"}"#;
        let back: PersistedPathState = serde_json::from_str(json).unwrap();
        assert!(back.into_state().is_err());
    }

    #[test]
    fn bad_digits_rejected() {
        let json = r#"{"path":"30","expected":"E0S0:1:1","target":"E0S0:5:5"}"#;
        let back: PersistedPathState = serde_json::from_str(json).unwrap();
        assert!(back.into_state().is_err());
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use sw_core::{AgentId, Direction};
    use sw_spatial::{
        GridRouter, RegionMapBuilder, Router, SearchContext, SearchRequest, Terrain, WorldMap,
    };

    use super::helpers::*;
    use crate::{
        FallbackChain, Idle, Journey, MarkerBook, MoveOptions, NextStep, PushThrough, ReuseBudget,
    };

    const A: AgentId = AgentId(1);
    const B: AgentId = AgentId(2);

    fn boxed_goal_world() -> WorldMap {
        WorldMap::new()
            .with_region(
                RegionMapBuilder::new(HOME)
                    .fill(28, 8, 32, 8, Terrain::Wall)
                    .fill(28, 12, 32, 12, Terrain::Wall)
                    .fill(28, 8, 28, 12, Terrain::Wall)
                    .fill(32, 8, 32, 12, Terrain::Wall)
                    .build(),
            )
            .unwrap()
    }

    #[test]
    fn first_step_searches_and_caches() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let mut eng = engine();
        let step = eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &MoveOptions::default(), &env(&world, &book, &crowd));
        assert_eq!(step, NextStep::Move(Direction::East));
        assert_eq!(eng.routes.len(), 1);
        assert_eq!(eng.routes.misses(), 1);

        let state = eng.path_state(A).unwrap();
        assert_eq!(state.path.len(), 28);
        assert_eq!(state.expected, t(11, 10));
        assert_eq!(state.target_fingerprint.as_deref(), Some("E0S0:40:10~1"));
    }

    #[test]
    fn n_steps_advance_n_tiles_then_arrive() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let mut eng = engine();
        let (end, last, moves) =
            walk(&mut eng, A, t(10, 10), &Journey::Direct(t(40, 10)), &MoveOptions::default(), &env, 100);
        assert_eq!(last, NextStep::Arrived);
        assert_eq!(moves, 29);
        assert_eq!(end, t(39, 10));
        assert!(eng.path_state(A).is_none(), "arrival clears path state");
        assert_eq!(eng.routes.misses(), 1, "one search for the whole trip");
    }

    #[test]
    fn same_trip_is_served_from_cache() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let mut eng = engine();
        let opts = MoveOptions::default();
        eng.advance(A, t(3, 44), Journey::Direct(t(41, 7)), &opts, &env);
        eng.advance(B, t(3, 44), Journey::Direct(t(41, 7)), &opts, &env);
        assert_eq!(eng.routes.hits(), 1);

        let mut fresh = sw_spatial::CostMatrixCache::new(Default::default());
        let mut ctx = SearchContext { world: &world, matrices: &mut fresh, obstacles: &() };
        let direct = GridRouter.find_path(&mut ctx, &SearchRequest::new(t(3, 44), t(41, 7))).unwrap();
        let mut expected = direct.path.clone();
        expected.pop_front();
        assert_eq!(eng.path_state(B).unwrap().path, expected);
        assert_eq!(eng.path_state(A).unwrap().path, expected);
    }

    #[test]
    fn persisted_state_gives_identical_next_move() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default();
        let journey = Journey::Direct(t(30, 40));

        let mut a = engine();
        let mut pos = t(5, 5);
        for _ in 0..3 {
            if let NextStep::Move(d) = a.advance(A, pos, journey.clone(), &opts, &env) {
                pos = pos.step(d);
            }
        }
        let json = serde_json::to_string(&a.persist(A).unwrap()).unwrap();

        let mut b = engine();
        b.restore(A, serde_json::from_str(&json).unwrap()).unwrap();
        let misses_before = b.routes.misses();

        let next_a = a.advance(A, pos, journey.clone(), &opts, &env);
        let next_b = b.advance(A, pos, journey, &opts, &env);
        assert_eq!(next_a, next_b);
        assert_eq!(b.routes.misses(), misses_before, "restored path reused without a search");
    }

    #[test]
    fn collision_rebuilds_region_matrix() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default();
        let mut eng = engine();

        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        let before = eng.matrices.peek(HOME).unwrap().version();

        // The move was accepted but the agent did not leave (10,10) and
        // nobody stands on (11,10).
        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        let after = eng.matrices.peek(HOME).unwrap().version();
        assert!(after > before);
        assert_eq!(eng.matrices.builds(), 2);
    }

    #[test]
    fn persistent_block_drops_path_and_routes_around() {
        let world = flat_world();
        let book = MarkerBook::new();
        let empty = Crowd::default();
        let opts = MoveOptions::default();
        let journey = Journey::Direct(t(40, 10));
        let mut eng = engine();

        assert_eq!(
            eng.advance(A, t(10, 10), journey.clone(), &opts, &env(&world, &book, &empty)),
            NextStep::Move(Direction::East)
        );
        let v1 = eng.matrices.peek(HOME).unwrap().version();

        let crowd = Crowd::default().with(t(11, 10), 9);
        let blocked = env(&world, &book, &crowd);

        // First refusal: keep the path and try again.
        assert_eq!(eng.advance(A, t(10, 10), journey.clone(), &opts, &blocked), NextStep::Move(Direction::East));
        assert_eq!(eng.path_state(A).unwrap().blocked_steps, 1);
        assert_eq!(eng.matrices.peek(HOME).unwrap().version(), v1);

        // Second: stuck threshold reached, matrix rebuilt with the occupant marked.
        let step = eng.advance(A, t(10, 10), journey, &opts, &blocked);
        assert!(matches!(step, NextStep::Move(d) if d != Direction::East), "got {step:?}");
        assert!(eng.matrices.peek(HOME).unwrap().version() > v1);
        assert_eq!(eng.matrices.peek(HOME).unwrap().get(11, 10), 254);
    }

    #[test]
    fn displaced_agent_rebases_without_searching() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default();
        let mut eng = engine();

        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        // Pushed aside to (11,11) instead of reaching (11,10).
        let step = eng.advance(A, t(11, 11), Journey::Direct(t(40, 10)), &opts, &env);
        assert_eq!(step, NextStep::Move(Direction::NorthEast));
        assert_eq!(eng.routes.misses(), 1);
        assert_eq!(eng.routes.hits(), 0);
    }

    #[test]
    fn retarget_searches_again() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default();
        let mut eng = engine();

        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        let step = eng.advance(A, t(11, 10), Journey::Direct(t(11, 40)), &opts, &env);
        assert_eq!(step, NextStep::Move(Direction::South));
        assert_eq!(eng.routes.misses(), 2);
    }

    #[test]
    fn reuse_budget_forces_refresh() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default().with_reuse(ReuseBudget::Steps(2));
        let mut eng = engine();
        let journey = Journey::Direct(t(40, 10));

        let mut pos = t(10, 10);
        for _ in 0..3 {
            if let NextStep::Move(d) = eng.advance(A, pos, journey.clone(), &opts, &env) {
                pos = pos.step(d);
            }
        }
        // Steps 1 and 3 planned; step 3 found nothing cached for (12,10).
        assert_eq!(eng.routes.misses(), 2);
        assert_eq!(eng.path_state(A).unwrap().reused_steps, 1);
    }

    #[test]
    fn waypoints_are_visited_in_order() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let opts = MoveOptions::default().with_range(0);
        let mut eng = engine();
        let journey = Journey::Waypoints([t(15, 10), t(15, 20)].into_iter().collect());

        let mut pos = t(10, 10);
        let mut visited_first = false;
        for _ in 0..50 {
            match eng.advance(A, pos, journey.clone(), &opts, &env) {
                NextStep::Move(d) => pos = pos.step(d),
                NextStep::Arrived => break,
                other => panic!("unexpected {other:?}"),
            }
            visited_first |= pos == t(15, 10);
        }
        assert!(visited_first);
        assert_eq!(pos, t(15, 20));
    }

    #[test]
    fn empty_waypoint_list_is_arrived() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let mut eng = engine();
        let none = Journey::Waypoints(Default::default());
        for _ in 0..2 {
            assert_eq!(eng.advance(A, t(10, 10), none.clone(), &MoveOptions::default(), &env), NextStep::Arrived);
            assert_eq!(eng.tracked(), 0);
        }
    }

    #[test]
    fn swapped_back_agent_is_not_counted_blocked() {
        let world = flat_world();
        let book = MarkerBook::new();
        let (empty, swapped) = (Crowd::default(), Crowd::default().with(t(11, 10), 2));
        let mut eng = engine();
        let journey = Journey::Direct(t(40, 10));
        eng.advance(A, t(10, 10), journey.clone(), &MoveOptions::default(), &env(&world, &book, &empty));
        // Stepped east, then swapped back by B onto the starting tile.
        eng.displace(A);
        eng.advance(A, t(10, 10), journey, &MoveOptions::default(), &env_without_obstacles(&world, &book, &swapped));
        assert_eq!(eng.path_state(A).unwrap().blocked_steps, 0);
    }

    #[test]
    fn marker_chain_auto_increments_then_follows_link() {
        let world = flat_world();
        let crowd = Crowd::default();
        let mut book = MarkerBook::new();
        book.place("flag1", t(20, 10));
        book.place_linked("flag2", t(20, 20), "home");
        book.place("home", t(25, 25));
        let env = env(&world, &book, &crowd);
        let mut eng = engine();

        let (end, last, _) = walk(
            &mut eng,
            A,
            t(10, 10),
            &Journey::markers("flag1"),
            &MoveOptions::default().with_range(0),
            &env,
            100,
        );
        assert_eq!(last, NextStep::Arrived);
        assert_eq!(end, t(25, 25));
    }

    #[test]
    fn missing_marker_is_no_path() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let mut eng = engine();
        let step = eng.advance(A, t(1, 1), Journey::markers("nowhere"), &MoveOptions::default(), &env(&world, &book, &crowd));
        assert_eq!(step, NextStep::NoPath);
        assert!(eng.path_state(A).is_some(), "journey kept for the next step");
    }

    #[test]
    fn unreachable_goal_follows_partial_without_caching() {
        let world = boxed_goal_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let mut eng = engine();
        let step = eng.advance(A, t(10, 10), Journey::Direct(t(30, 10)), &MoveOptions::default(), &env);
        assert!(matches!(step, NextStep::Move(_)));
        assert!(eng.path_state(A).unwrap().incomplete);
        assert!(eng.routes.is_empty());
    }

    #[test]
    fn fallback_chain_variants() {
        let world = boxed_goal_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let journey = Journey::Direct(t(30, 10));

        let none = MoveOptions::default().with_fallback(FallbackChain::empty());
        assert_eq!(engine().advance(A, t(10, 10), journey.clone(), &none, &env), NextStep::NoPath);

        let idle = MoveOptions::default().with_fallback(FallbackChain::empty().then(Idle));
        assert_eq!(engine().advance(A, t(10, 10), journey.clone(), &idle, &env), NextStep::Wait);

        let push = MoveOptions::default()
            .with_max_nodes(1)
            .with_fallback(FallbackChain::empty().then(PushThrough));
        assert_eq!(
            engine().advance(A, t(10, 10), journey, &push, &env),
            NextStep::Move(Direction::East)
        );
    }

    #[test]
    fn avoiding_friendlies_routes_around_and_skips_cache() {
        let world = flat_world();
        let book = MarkerBook::new();
        let crowd = Crowd::default().with(t(11, 10), 9);
        let env = env_without_obstacles(&world, &book, &crowd);
        let mut eng = engine();
        let opts = MoveOptions::default().avoiding_friendlies();
        let step = eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        assert!(matches!(step, NextStep::Move(d) if d != Direction::East), "got {step:?}");
        assert!(eng.routes.is_empty());
        assert_eq!(eng.matrices.peek(HOME).unwrap().get(11, 10), 2, "shared matrix unmarked");
    }

    /// Occupancy from `crowd` but no agents marked in the shared matrices.
    fn env_without_obstacles<'a>(
        world: &'a WorldMap,
        book: &'a MarkerBook,
        crowd: &'a Crowd,
    ) -> crate::MoveEnv<'a> {
        crate::MoveEnv { world, markers: book, obstacles: &(), occupancy: crowd }
    }

    #[test]
    fn forbidden_region_bypasses_cache() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let env = env(&world, &book, &crowd);
        let mut eng = engine();
        let opts = MoveOptions::default().forbid(sw_core::RegionId::new(1, 0));
        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &opts, &env);
        assert!(eng.routes.is_empty());
    }

    #[test]
    fn take_persisted_removes_state() {
        let world = flat_world();
        let (book, crowd) = (MarkerBook::new(), Crowd::default());
        let mut eng = engine();
        eng.advance(A, t(10, 10), Journey::Direct(t(40, 10)), &MoveOptions::default(), &env(&world, &book, &crowd));
        let p = eng.take_persisted(A).unwrap();
        assert_eq!(p.target.as_deref(), Some("E0S0:40:10"));
        assert_eq!(eng.tracked(), 0);
        assert!(eng.insert_state(A, p.into_state().unwrap()).is_ok());
        let dup = eng.persist(A).unwrap().into_state().unwrap();
        assert!(eng.insert_state(A, dup).is_err());
    }
}
