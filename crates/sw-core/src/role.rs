//! Agent roles shared by the traffic and agent crates.
//!
//! Roles are a closed set.  Yield behaviour is looked up per role in
//! `sw-traffic`'s rule table; several roles can perform the same logical
//! [`Job`], and agents with the same job treat each other as peers when
//! deciding whether to step aside.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// What an agent is for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// No specialised behaviour; uses the default yield rule.
    #[default]
    General,
    Harvester,
    /// Static harvester parked on a container.  Same job as `Harvester`.
    Miner,
    Hauler,
    /// Keeps spawns and extensions topped up; always steps aside.
    Filler,
    Upgrader,
    Builder,
    Repairer,
    Scout,
}

/// The logical job a role performs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Job {
    General,
    Harvest,
    Haul,
    Fill,
    Upgrade,
    Build,
    Repair,
    Scout,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::General,
        Role::Harvester,
        Role::Miner,
        Role::Hauler,
        Role::Filler,
        Role::Upgrader,
        Role::Builder,
        Role::Repairer,
        Role::Scout,
    ];

    pub fn job(self) -> Job {
        match self {
            Role::General                 => Job::General,
            Role::Harvester | Role::Miner => Job::Harvest,
            Role::Hauler                  => Job::Haul,
            Role::Filler                  => Job::Fill,
            Role::Upgrader                => Job::Upgrade,
            Role::Builder                 => Job::Build,
            Role::Repairer                => Job::Repair,
            Role::Scout                   => Job::Scout,
        }
    }

    #[inline]
    pub fn same_job(self, other: Role) -> bool {
        self.job() == other.job()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::General   => "general",
            Role::Harvester => "harvester",
            Role::Miner     => "miner",
            Role::Hauler    => "hauler",
            Role::Filler    => "filler",
            Role::Upgrader  => "upgrader",
            Role::Builder   => "builder",
            Role::Repairer  => "repairer",
            Role::Scout     => "scout",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Parse(format!("unknown role {s:?}")))
    }
}
