//! Unit tests for sw-handoff.

use sw_agent::AgentRecord;
use sw_core::{AgentId, PartitionId, RegionId, Role, Tick, TilePos};

use crate::{AgentTransfer, TransferMessage};

const A: PartitionId = PartitionId(1);
const B: PartitionId = PartitionId(2);

fn transfer(agent: u32, tick: u64) -> AgentTransfer {
    AgentTransfer {
        agent:   AgentRecord::new(AgentId(agent), Role::Hauler, TilePos::new(RegionId::new(1, 0), 1, 25))
            .carrying(true),
        path:    None,
        sent_at: Tick(tick),
    }
}

fn msg(target: PartitionId, agent: u32) -> TransferMessage {
    TransferMessage::agent_transfer(target, &transfer(agent, 10)).unwrap()
}

// ── Message ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod message {
    use super::*;
    use crate::message_name;

    #[test]
    fn name_is_namespaced_by_sender() {
        assert_eq!(message_name(A, AgentId(7), Tick(120)), "1:7:120");
    }

    #[test]
    fn wire_shape() {
        let json = serde_json::to_value(msg(B, 7)).unwrap();
        assert_eq!(json["targetPartition"], 2);
        assert_eq!(json["kind"], "agentTransfer");
        assert_eq!(json["payload"]["sentAt"], 10);
        assert_eq!(json["payload"]["agent"]["role"], "hauler");
        assert_eq!(json["payload"]["agent"]["carrying"], true);
        assert!(json["payload"].get("path").is_none());
    }

    #[test]
    fn decode_restores_transfer() {
        let m = msg(B, 7);
        assert_eq!(m.decode().unwrap(), transfer(7, 10));
    }

    #[test]
    fn path_state_travels() {
        let path: sw_mobility::PersistedPathState = serde_json::from_str(
            r#"{"path":"333","expected":"E1S0:1:25","target":"E1S0:20:25"}"#,
        )
        .unwrap();
        let t = AgentTransfer { path: Some(path.clone()), ..transfer(3, 4) };
        let m = TransferMessage::agent_transfer(B, &t).unwrap();
        assert_eq!(m.decode().unwrap().path, Some(path));
    }

    #[test]
    fn garbage_payload_is_error() {
        let m = TransferMessage { payload: serde_json::json!({"agent": 3}), ..msg(B, 1) };
        assert!(m.decode().is_err());
    }
}

// ── Outbox / Mailbox ──────────────────────────────────────────────────────────

#[cfg(test)]
mod outbox {
    use super::*;
    use crate::{HandoffError, Mailbox, Outbox};

    #[test]
    fn duplicate_names_rejected() {
        let mut out = Outbox::new(A);
        out.push("1:7:10".into(), msg(B, 7)).unwrap();
        assert!(matches!(
            out.push("1:7:10".into(), msg(B, 7)),
            Err(HandoffError::DuplicateName(_))
        ));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn drain_empties() {
        let mut out = Outbox::new(A);
        out.push("1:7:10".into(), msg(B, 7)).unwrap();
        out.push("1:8:10".into(), msg(PartitionId(3), 8)).unwrap();
        assert_eq!(out.pending_for(B).map(|m| m.len()), Some(1));
        let drained = out.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].0, "1:7:10");
        assert!(out.is_empty());
    }

    #[test]
    fn mailbox_drains_in_name_order() {
        let mut inbox = Mailbox::new();
        inbox.insert("b".into(), msg(B, 2)).unwrap();
        inbox.insert("a".into(), msg(B, 1)).unwrap();
        assert!(inbox.contains("a"));
        let names: Vec<_> = inbox.drain().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(inbox.is_empty());
    }
}

// ── ShardBus ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bus {
    use super::*;
    use crate::{HandoffError, Outbox, ShardBus};

    #[test]
    fn post_then_take() {
        let mut bus = ShardBus::new();
        let mut out = Outbox::new(A);
        out.push("1:7:10".into(), msg(B, 7)).unwrap();
        assert_eq!(bus.post(&mut out).unwrap(), 1);
        assert!(out.is_empty());
        assert_eq!(bus.pending(B), 1);
        assert_eq!(bus.pending(A), 0);

        let mut inbox = bus.take(B);
        assert_eq!(inbox.len(), 1);
        assert_eq!(bus.pending(B), 0);
        assert_eq!(inbox.drain()[0].1.decode().unwrap().agent.id, AgentId(7));
    }

    #[test]
    fn undrained_messages_wait() {
        let mut bus = ShardBus::new();
        let mut out = Outbox::new(A);
        out.push("1:7:10".into(), msg(B, 7)).unwrap();
        bus.post(&mut out).unwrap();
        assert!(bus.take(A).is_empty());
        assert_eq!(bus.pending(B), 1);
    }

    #[test]
    fn duplicate_across_posts_rejected() {
        let mut bus = ShardBus::new();
        let mut first = Outbox::new(A);
        first.push("1:7:10".into(), msg(B, 7)).unwrap();
        bus.post(&mut first).unwrap();

        let mut second = Outbox::new(A);
        second.push("1:7:10".into(), msg(B, 7)).unwrap();
        assert!(matches!(bus.post(&mut second), Err(HandoffError::DuplicateName(_))));
        assert_eq!(bus.pending(B), 1);
    }

    #[test]
    fn rejected_post_keeps_whole_outbox() {
        let mut bus = ShardBus::new();
        bus.deliver(B, "a".into(), msg(B, 1)).unwrap();

        let mut out = Outbox::new(A);
        out.push("a".into(), msg(B, 1)).unwrap();
        out.push("b".into(), msg(B, 2)).unwrap();
        assert!(matches!(bus.post(&mut out), Err(HandoffError::DuplicateName(n)) if n == "a"));
        assert_eq!(out.len(), 2, "nothing drained");
        assert_eq!(bus.pending(B), 1);

        // Once the clash is gone the same outbox posts in full.
        bus.take(B);
        assert_eq!(bus.post(&mut out).unwrap(), 2);
        assert!(bus.take(B).contains("b"));
    }

    #[test]
    fn misaddressed_delivery_rejected() {
        let mut bus = ShardBus::new();
        bus.deliver(A, "y".into(), msg(A, 2)).unwrap();
        assert!(matches!(
            bus.deliver(A, "x".into(), msg(B, 1)),
            Err(HandoffError::Misaddressed { addressed: B, inbox: A, .. })
        ));
        let inbox = bus.take(A);
        assert_eq!(inbox.len(), 1);
        assert!(inbox.contains("y"));
    }
}
