//! Yield rules: whether an occupant steps aside for a requester.
//!
//! Each [`Role`] maps to one [`YieldRule`] in a [`YieldTable`] built once at
//! startup; roles without an entry use the table's fallback rule.
//!
//! | Role(s)              | Rule                                              |
//! |----------------------|---------------------------------------------------|
//! | `Filler`, `Scout`    | always yield                                      |
//! | `Hauler`             | never while carrying, otherwise the default       |
//! | everything else      | default: refuse while working for a same-job peer |

use rustc_hash::FxHashMap;

use sw_agent::AgentRecord;
use sw_core::{AgentId, Role};

/// The parts of an agent a yield rule looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct YieldSubject {
    pub agent:    AgentId,
    pub role:     Role,
    pub working:  bool,
    pub carrying: bool,
}

impl YieldSubject {
    pub fn of(record: &AgentRecord) -> Self {
        Self {
            agent:    record.id,
            role:     record.role,
            working:  record.working,
            carrying: record.carrying,
        }
    }
}

/// `true` if `occupant` vacates its tile for `requester`.
pub type YieldRule = fn(occupant: &YieldSubject, requester: &YieldSubject) -> bool;

/// Refuse while doing stationary work and the requester has the same job.
pub fn default_rule(occupant: &YieldSubject, requester: &YieldSubject) -> bool {
    !(occupant.working && occupant.role.same_job(requester.role))
}

pub fn always_yield(_occupant: &YieldSubject, _requester: &YieldSubject) -> bool {
    true
}

pub fn hold_while_carrying(occupant: &YieldSubject, requester: &YieldSubject) -> bool {
    !occupant.carrying && default_rule(occupant, requester)
}

// ── YieldTable ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct YieldTable {
    rules:    FxHashMap<Role, YieldRule>,
    fallback: YieldRule,
}

impl YieldTable {
    /// A table with no per-role entries.
    pub fn new(fallback: YieldRule) -> Self {
        Self { rules: FxHashMap::default(), fallback }
    }

    /// The standard rule set.
    pub fn standard() -> Self {
        Self::new(default_rule)
            .with_rule(Role::Filler, always_yield)
            .with_rule(Role::Scout, always_yield)
            .with_rule(Role::Hauler, hold_while_carrying)
    }

    pub fn with_rule(mut self, role: Role, rule: YieldRule) -> Self {
        self.rules.insert(role, rule);
        self
    }

    pub fn rule_for(&self, role: Role) -> YieldRule {
        self.rules.get(&role).copied().unwrap_or(self.fallback)
    }

    pub fn yields(&self, occupant: &YieldSubject, requester: &YieldSubject) -> bool {
        (self.rule_for(occupant.role))(occupant, requester)
    }

    /// `true` if `occupant` would refuse a same-role peer.
    ///
    /// Such agents are marked near-impassable in the shared cost matrices so
    /// searches route around them instead of negotiating.
    pub fn holds_position(&self, occupant: &YieldSubject) -> bool {
        let peer = YieldSubject {
            agent:    AgentId::INVALID,
            role:     occupant.role,
            working:  false,
            carrying: false,
        };
        !self.yields(occupant, &peer)
    }
}

impl Default for YieldTable {
    fn default() -> Self {
        Self::standard()
    }
}
