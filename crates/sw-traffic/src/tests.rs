//! Unit tests for sw-traffic.

use sw_core::{AgentId, Role};

use crate::YieldSubject;

fn subject(id: u32, role: Role) -> YieldSubject {
    YieldSubject { agent: AgentId(id), role, working: false, carrying: false }
}

fn working(id: u32, role: Role) -> YieldSubject {
    YieldSubject { working: true, ..subject(id, role) }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rules {
    use super::*;
    use crate::{always_yield, default_rule, YieldTable};

    #[test]
    fn working_peer_refuses_same_job() {
        let table = YieldTable::standard();
        assert!(!table.yields(&working(1, Role::Harvester), &subject(2, Role::Harvester)));
        assert!(!table.yields(&working(1, Role::Miner), &subject(2, Role::Harvester)));
        assert!(table.yields(&working(1, Role::Harvester), &subject(2, Role::Upgrader)));
        assert!(table.yields(&subject(1, Role::Harvester), &subject(2, Role::Harvester)));
    }

    #[test]
    fn filler_always_yields() {
        let table = YieldTable::standard();
        for role in Role::ALL {
            let occupant = YieldSubject { carrying: true, ..working(1, Role::Filler) };
            assert!(table.yields(&occupant, &subject(2, role)), "filler refused {role}");
        }
    }

    #[test]
    fn hauler_holds_while_carrying() {
        let table = YieldTable::standard();
        let loaded = YieldSubject { carrying: true, ..subject(1, Role::Hauler) };
        assert!(!table.yields(&loaded, &subject(2, Role::Builder)));
        assert!(table.yields(&subject(1, Role::Hauler), &subject(2, Role::Builder)));
    }

    #[test]
    fn distinct_jobs_stay_distinct() {
        let table = YieldTable::standard();
        for (a, b) in [(Role::Upgrader, Role::Builder), (Role::Builder, Role::Repairer)] {
            assert!(table.yields(&working(1, a), &subject(2, b)));
            assert!(!table.yields(&working(1, a), &subject(2, a)));
        }
    }

    #[test]
    fn custom_table_overrides() {
        let table = YieldTable::new(always_yield).with_rule(Role::Builder, default_rule);
        assert!(table.yields(&working(1, Role::Harvester), &subject(2, Role::Harvester)));
        assert!(!table.yields(&working(1, Role::Builder), &subject(2, Role::Builder)));
    }

    #[test]
    fn holders_are_refusers() {
        let table = YieldTable::standard();
        assert!(table.holds_position(&working(1, Role::Upgrader)));
        assert!(!table.holds_position(&working(1, Role::Filler)));
        assert!(!table.holds_position(&subject(1, Role::General)));
        assert!(table.holds_position(&YieldSubject { carrying: true, ..subject(1, Role::Hauler) }));
    }
}

// ── Negotiator ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod negotiator {
    use sw_core::Direction;

    use super::*;
    use crate::{Negotiation, Negotiator, SwapRequest};

    #[test]
    fn accepted_occupant_steps_back_toward_requester() {
        let mut n = Negotiator::default();
        let req = SwapRequest {
            requester: subject(1, Role::Hauler),
            occupant:  subject(2, Role::Filler),
            heading:   Direction::East,
        };
        assert_eq!(n.negotiate(&req), Negotiation::Accepted { vacate: Direction::West });
    }

    #[test]
    fn refusal_counted() {
        let mut n = Negotiator::default();
        let req = SwapRequest {
            requester: subject(1, Role::Upgrader),
            occupant:  working(2, Role::Upgrader),
            heading:   Direction::North,
        };
        assert_eq!(n.negotiate(&req), Negotiation::Refused);
        let stats = n.stats();
        assert_eq!((stats.requests, stats.accepted, stats.refused), (1, 0, 1));
    }
}

// ── Holders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod holders {
    use sw_agent::{AgentRecord, AgentStore};
    use sw_core::{RegionId, TilePos};
    use sw_spatial::AgentObstacles;

    use super::*;
    use crate::{PositionHolders, YieldTable};

    #[test]
    fn only_refusing_agents_listed() {
        let home = RegionId::new(0, 0);
        let mut store = AgentStore::new();
        store.insert(AgentRecord::new(AgentId(1), Role::Upgrader, TilePos::new(home, 5, 5)).working(true)).unwrap();
        store.insert(AgentRecord::new(AgentId(2), Role::Filler, TilePos::new(home, 6, 5)).working(true)).unwrap();
        store.insert(AgentRecord::new(AgentId(3), Role::General, TilePos::new(home, 7, 5))).unwrap();
        store.insert(AgentRecord::new(AgentId(4), Role::Miner, TilePos::new(RegionId::new(1, 0), 1, 1)).working(true)).unwrap();

        let table = YieldTable::standard();
        let holders = PositionHolders { store: &store, table: &table };
        assert_eq!(holders.stationary_tiles(home), vec![TilePos::new(home, 5, 5)]);
        assert_eq!(holders.stationary_tiles(RegionId::new(1, 0)).len(), 1);
    }
}
