//! Plain data row types written by output backends.

/// What one agent's order came to in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeRow {
    pub partition: u16,
    pub tick:      u64,
    pub agent:     u32,
    pub outcome:   &'static str,
    /// Destination partition of a handoff; `u16::MAX` otherwise.
    pub handed_to: u16,
}

/// Per-step totals for one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub partition: u16,
    pub tick:      u64,
    pub orders:    u64,
    pub moved:     u64,
    pub blocked:   u64,
    pub handoffs:  u64,
}

/// One entry of a route-cache snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub partition: u16,
    pub tick:      u64,
    pub key:       String,
    pub len:       u64,
    pub hits:      u64,
    pub misses:    u64,
}
