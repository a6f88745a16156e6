use dashmap::DashMap;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A bookable room: identity, creation time and a hard participant cap.
#[derive(Debug, Clone)]
pub struct Meeting {
    pub id: String,
    pub created_at_ms: u64,
    pub limit: usize,
    participants: HashSet<String>,
}

impl Meeting {
    fn new(id: String, limit: usize) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id,
            created_at_ms,
            limit,
            participants: HashSet::new(),
        }
    }

    pub fn participants(&self) -> usize {
        self.participants.len()
    }
}

/// Outcome of an admission attempt against a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Admitted { participants: usize, limit: usize },
    Full,
    UnknownRoom,
}

/// All live meetings, shared across REST handlers.
pub struct MeetingRegistry {
    meetings: DashMap<String, Meeting>,
    default_limit: usize,
}

impl MeetingRegistry {
    pub fn new(default_limit: usize) -> Self {
        Self {
            meetings: DashMap::new(),
            default_limit,
        }
    }

    pub fn create(&self) -> Meeting {
        let id = Uuid::new_v4().to_string();
        let meeting = Meeting::new(id.clone(), self.default_limit);
        self.meetings.insert(id, meeting.clone());
        meeting
    }

    pub fn get(&self, id: &str) -> Option<Meeting> {
        self.meetings.get(id).map(|m| m.clone())
    }

    /// Admits `client_id` unless the cap is already reached. Re-joining
    /// a participant that is already counted succeeds without growing
    /// the membership.
    pub fn try_join(&self, id: &str, client_id: &str) -> JoinOutcome {
        let Some(mut meeting) = self.meetings.get_mut(id) else {
            return JoinOutcome::UnknownRoom;
        };
        if meeting.participants.contains(client_id) {
            return JoinOutcome::Admitted {
                participants: meeting.participants(),
                limit: meeting.limit,
            };
        }
        if meeting.participants() >= meeting.limit {
            return JoinOutcome::Full;
        }
        meeting.participants.insert(client_id.to_owned());
        JoinOutcome::Admitted {
            participants: meeting.participants(),
            limit: meeting.limit,
        }
    }

    /// Drops `client_id` from the meeting, returning the remaining
    /// headcount. Unknown rooms and absent participants are no-ops.
    pub fn leave(&self, id: &str, client_id: &str) -> Option<usize> {
        let mut meeting = self.meetings.get_mut(id)?;
        meeting.participants.remove(client_id);
        Some(meeting.participants())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_until_the_cap() {
        let registry = MeetingRegistry::new(2);
        let meeting = registry.create();

        assert!(matches!(
            registry.try_join(&meeting.id, "aaa"),
            JoinOutcome::Admitted {
                participants: 1,
                limit: 2
            }
        ));
        assert!(matches!(
            registry.try_join(&meeting.id, "bbb"),
            JoinOutcome::Admitted {
                participants: 2,
                limit: 2
            }
        ));
        assert_eq!(registry.try_join(&meeting.id, "ccc"), JoinOutcome::Full);
    }

    #[test]
    fn rejoin_does_not_double_count() {
        let registry = MeetingRegistry::new(2);
        let meeting = registry.create();

        registry.try_join(&meeting.id, "aaa");
        assert!(matches!(
            registry.try_join(&meeting.id, "aaa"),
            JoinOutcome::Admitted {
                participants: 1,
                ..
            }
        ));
    }

    #[test]
    fn leave_frees_a_slot() {
        let registry = MeetingRegistry::new(1);
        let meeting = registry.create();

        registry.try_join(&meeting.id, "aaa");
        assert_eq!(registry.try_join(&meeting.id, "bbb"), JoinOutcome::Full);
        assert_eq!(registry.leave(&meeting.id, "aaa"), Some(0));
        assert!(matches!(
            registry.try_join(&meeting.id, "bbb"),
            JoinOutcome::Admitted { .. }
        ));
    }

    #[test]
    fn unknown_room_is_reported() {
        let registry = MeetingRegistry::new(2);
        assert_eq!(registry.try_join("nope", "aaa"), JoinOutcome::UnknownRoom);
        assert_eq!(registry.leave("nope", "aaa"), None);
    }
}
