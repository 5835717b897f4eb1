//! `ShardBus`: fire-and-forget delivery between partitions.
//!
//! Partitions never share memory.  At the end of its step a partition posts
//! its outbox; at the start of its next step each partition takes whatever
//! arrived.  A message for a partition that never runs again simply stays
//! here.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use sw_core::PartitionId;

use crate::{HandoffError, HandoffResult, Mailbox, Outbox, TransferMessage};

#[derive(Debug, Default)]
pub struct ShardBus {
    inboxes: BTreeMap<PartitionId, Mailbox>,
}

impl ShardBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every message in `outbox` into its destination inbox.
    ///
    /// Returns the number delivered.  If any name is already waiting in its
    /// destination inbox nothing is posted and the outbox is left as it was.
    pub fn post(&mut self, outbox: &mut Outbox) -> HandoffResult<usize> {
        let source = outbox.source();
        if let Some((name, _)) = outbox
            .iter()
            .find(|(name, m)| self.inboxes.get(&m.target_partition).is_some_and(|i| i.contains(name)))
        {
            return Err(HandoffError::DuplicateName(name.to_owned()));
        }

        let mut delivered = 0;
        for (name, message) in outbox.drain() {
            let target = message.target_partition;
            self.inboxes.entry(target).or_default().insert(name, message)?;
            delivered += 1;
        }
        if delivered > 0 {
            debug!(target: "shardwalk::handoff", %source, delivered, "bus.post");
        }
        Ok(delivered)
    }

    /// Drain `partition`'s inbox, in name order.
    pub fn take(&mut self, partition: PartitionId) -> Mailbox {
        let inbox = self.inboxes.remove(&partition).unwrap_or_default();
        trace!(target: "shardwalk::handoff", %partition, n = inbox.len(), "bus.take");
        inbox
    }

    /// Messages waiting for `partition`.
    pub fn pending(&self, partition: PartitionId) -> usize {
        self.inboxes.get(&partition).map_or(0, Mailbox::len)
    }

    /// Deliver a single message directly, e.g. from an external transport or
    /// to re-queue an arrival that could not be installed yet.
    ///
    /// The message must be addressed to `partition` and its name must not be
    /// waiting there already.
    pub fn deliver(
        &mut self,
        partition: PartitionId,
        name:      String,
        message:   TransferMessage,
    ) -> HandoffResult<()> {
        if message.target_partition != partition {
            return Err(HandoffError::Misaddressed {
                name,
                addressed: message.target_partition,
                inbox: partition,
            });
        }
        self.inboxes.entry(partition).or_default().insert(name, message)
    }
}
