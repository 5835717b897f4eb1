//! Per-partition outgoing and incoming message stores.

use std::collections::BTreeMap;

use sw_core::PartitionId;

use crate::{HandoffError, HandoffResult, TransferMessage};

/// Messages a partition produced this step, grouped by destination.
#[derive(Debug)]
pub struct Outbox {
    source:   PartitionId,
    messages: BTreeMap<PartitionId, BTreeMap<String, TransferMessage>>,
}

impl Outbox {
    pub fn new(source: PartitionId) -> Self {
        Self { source, messages: BTreeMap::new() }
    }

    pub fn source(&self) -> PartitionId {
        self.source
    }

    /// Queue `message` under `name`.  Names are unique per destination.
    pub fn push(&mut self, name: String, message: TransferMessage) -> HandoffResult<()> {
        let slot = self.messages.entry(message.target_partition).or_default();
        if slot.contains_key(&name) {
            return Err(HandoffError::DuplicateName(name));
        }
        slot.insert(name, message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.values().all(BTreeMap::is_empty)
    }

    /// Queued messages for one destination.
    pub fn pending_for(&self, target: PartitionId) -> Option<&BTreeMap<String, TransferMessage>> {
        self.messages.get(&target)
    }

    /// Queued messages, ordered by destination then name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransferMessage)> + '_ {
        self.messages
            .values()
            .flat_map(|slot| slot.iter().map(|(name, m)| (name.as_str(), m)))
    }

    /// Take every queued message, ordered by destination then name.
    pub fn drain(&mut self) -> Vec<(String, TransferMessage)> {
        std::mem::take(&mut self.messages)
            .into_values()
            .flat_map(BTreeMap::into_iter)
            .collect()
    }
}

/// One partition's inbox.
#[derive(Debug, Default)]
pub struct Mailbox {
    messages: BTreeMap<String, TransferMessage>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, message: TransferMessage) -> HandoffResult<()> {
        if self.messages.contains_key(&name) {
            return Err(HandoffError::DuplicateName(name));
        }
        self.messages.insert(name, message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.messages.contains_key(name)
    }

    /// All messages in name order, leaving the mailbox empty.
    pub fn drain(&mut self) -> Vec<(String, TransferMessage)> {
        std::mem::take(&mut self.messages).into_iter().collect()
    }
}
