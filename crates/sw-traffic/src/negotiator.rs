//! The step-aside exchange between a blocked agent and the occupant of the
//! tile it wants.
//!
//! One request, one decision, within the step.  Nothing is queued: a refused
//! requester asks again on a later step if its path still leads here.

use tracing::debug;

use sw_core::Direction;

use crate::rules::{YieldSubject, YieldTable};

/// A blocked agent asking `occupant` to vacate.
#[derive(Copy, Clone, Debug)]
pub struct SwapRequest {
    pub requester: YieldSubject,
    pub occupant:  YieldSubject,
    /// Direction the requester wants to move in.
    pub heading:   Direction,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Negotiation {
    /// The occupant steps in `vacate` (onto the requester's tile).
    Accepted { vacate: Direction },
    Refused,
}

/// Running totals for one partition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NegotiationStats {
    pub requests: u64,
    pub accepted: u64,
    pub refused:  u64,
}

#[derive(Debug, Default)]
pub struct Negotiator {
    table: YieldTable,
    stats: NegotiationStats,
}

impl Negotiator {
    pub fn new(table: YieldTable) -> Self {
        Self { table, stats: NegotiationStats::default() }
    }

    pub fn table(&self) -> &YieldTable {
        &self.table
    }

    pub fn stats(&self) -> NegotiationStats {
        self.stats
    }

    /// Ask the occupant to swap places with the requester.
    pub fn negotiate(&mut self, req: &SwapRequest) -> Negotiation {
        self.stats.requests += 1;
        let accepted = self.table.yields(&req.occupant, &req.requester);
        debug!(
            target: "shardwalk::traffic",
            requester = %req.requester.agent,
            occupant = %req.occupant.agent,
            occupant_role = %req.occupant.role,
            accepted,
            "negotiate"
        );
        if accepted {
            self.stats.accepted += 1;
            Negotiation::Accepted { vacate: req.heading.opposite() }
        } else {
            self.stats.refused += 1;
            Negotiation::Refused
        }
    }
}
