//! `sw-handoff` — moving an agent from one partition to another.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`message`] | `TransferMessage`, `AgentTransfer`, `MessageKind`, `message_name` |
//! | [`outbox`]  | `Outbox` (per-step outgoing), `Mailbox` (incoming)          |
//! | [`bus`]     | `ShardBus` (post / take between partitions)                 |
//! | [`error`]   | `HandoffError`, `HandoffResult<T>`                          |
//!
//! # Protocol
//!
//! When an agent's next tile is a portal, the source partition serializes
//! the agent's record and path state into an [`AgentTransfer`], queues it in
//! its [`Outbox`] under [`message_name`], and deletes the agent, all in the
//! same step.  The agent exists in neither partition until the destination
//! drains its inbox at the start of its next step and installs it at the
//! portal's exit tile.

pub mod bus;
pub mod error;
pub mod message;
pub mod outbox;

#[cfg(test)]
mod tests;

pub use bus::ShardBus;
pub use error::{HandoffError, HandoffResult};
pub use message::{message_name, AgentTransfer, MessageKind, TransferMessage};
pub use outbox::{Mailbox, Outbox};
