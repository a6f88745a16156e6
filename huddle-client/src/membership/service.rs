use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::{ClientId, RoomId};
use std::collections::HashSet;

/// Outcome of one capacity check against the membership store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admitted,
    Rejected { reason: String },
}

/// External room-capacity store (a REST backend in production). `join`
/// is called once per admission attempt; a rejection is terminal for the
/// attempt. `leave` is best-effort and never blocks teardown.
#[async_trait]
pub trait MembershipService: Send + Sync {
    async fn join(&self, room: &RoomId, client: &ClientId) -> Result<AdmissionDecision>;
    async fn leave(&self, room: &RoomId, client: &ClientId) -> Result<()>;
}

/// In-process capacity store with the backend's semantics: joining twice
/// with the same id is idempotent, a full room rejects, leaving frees the
/// slot. Used by tests and local single-process wiring.
pub struct InMemoryMembership {
    limit: usize,
    rooms: DashMap<RoomId, HashSet<ClientId>>,
}

impl InMemoryMembership {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            rooms: DashMap::new(),
        }
    }

    pub fn participants(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MembershipService for InMemoryMembership {
    async fn join(&self, room: &RoomId, client: &ClientId) -> Result<AdmissionDecision> {
        let mut members = self.rooms.entry(room.clone()).or_default();
        if members.contains(client) {
            return Ok(AdmissionDecision::Admitted);
        }
        if members.len() >= self.limit {
            return Ok(AdmissionDecision::Rejected {
                reason: format!("room limited to {} participants", self.limit),
            });
        }
        members.insert(client.clone());
        Ok(AdmissionDecision::Admitted)
    }

    async fn leave(&self, room: &RoomId, client: &ClientId) -> Result<()> {
        if let Some(mut members) = self.rooms.get_mut(room) {
            members.remove(client);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_when_full() {
        let store = InMemoryMembership::new(2);
        let room = RoomId::from("r1");

        assert_eq!(
            store.join(&room, &ClientId::from("a")).await.unwrap(),
            AdmissionDecision::Admitted
        );
        assert_eq!(
            store.join(&room, &ClientId::from("b")).await.unwrap(),
            AdmissionDecision::Admitted
        );
        assert!(matches!(
            store.join(&room, &ClientId::from("c")).await.unwrap(),
            AdmissionDecision::Rejected { .. }
        ));
    }

    #[tokio::test]
    async fn rejoin_is_idempotent() {
        let store = InMemoryMembership::new(1);
        let room = RoomId::from("r1");
        let a = ClientId::from("a");

        store.join(&room, &a).await.unwrap();
        assert_eq!(
            store.join(&room, &a).await.unwrap(),
            AdmissionDecision::Admitted
        );
        assert_eq!(store.participants(&room), 1);
    }

    #[tokio::test]
    async fn leave_frees_the_slot() {
        let store = InMemoryMembership::new(1);
        let room = RoomId::from("r1");

        store.join(&room, &ClientId::from("a")).await.unwrap();
        store.leave(&room, &ClientId::from("a")).await.unwrap();
        assert_eq!(
            store.join(&room, &ClientId::from("b")).await.unwrap(),
            AdmissionDecision::Admitted
        );
    }
}
