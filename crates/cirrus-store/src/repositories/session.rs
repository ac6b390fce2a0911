//! Upload session repository with atomic chunk-set union.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use cirrus_core::types::{UploadSessionId, UserId};
use cirrus_entity::upload::UploadSession;

/// Repository for [`UploadSession`] records.
#[derive(Debug, Default)]
pub struct UploadSessionRepository {
    /// Sessions by id.
    sessions: DashMap<UploadSessionId, UploadSession>,
}

impl UploadSessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session record.
    pub fn insert(&self, session: UploadSession) -> UploadSession {
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Find a session by id.
    pub fn find(&self, id: UploadSessionId) -> Option<UploadSession> {
        self.sessions.get(&id).map(|s| s.clone())
    }

    /// Find a session by id, restricted to the given owner.
    pub fn find_owned(&self, id: UploadSessionId, owner_id: UserId) -> Option<UploadSession> {
        self.find(id).filter(|s| s.owner_id == owner_id)
    }

    /// Atomically add a chunk index to the session's received set.
    ///
    /// This is a set-union under the record's write lock, not a
    /// read-modify-write of the whole session, so concurrent chunk writers
    /// for the same session cannot lose each other's updates. Duplicate
    /// indices are no-ops. Returns the new received count, or `None` if
    /// the session does not exist.
    pub fn add_received_chunk(&self, id: UploadSessionId, index: u32) -> Option<u32> {
        self.sessions.get_mut(&id).map(|mut session| {
            session.received_chunks.insert(index);
            session.received_count()
        })
    }

    /// Remove a session record, returning it if present.
    pub fn remove(&self, id: UploadSessionId) -> Option<UploadSession> {
        self.sessions.remove(&id).map(|(_, s)| s)
    }

    /// Conditionally remove a session only if it is still expired at `now`.
    ///
    /// The janitor uses this so that a racing `complete_upload` either wins
    /// cleanly (this call no-ops because the session is gone) or loses
    /// cleanly (the session disappears atomically).
    pub fn remove_if_expired(&self, id: UploadSessionId, now: DateTime<Utc>) -> bool {
        self.sessions
            .remove_if(&id, |_, session| session.is_expired(now))
            .is_some()
    }

    /// All sessions expired at `now`, across owners.
    pub fn expired(&self, now: DateTime<Utc>) -> Vec<UploadSession> {
        self.sessions
            .iter()
            .filter(|s| s.is_expired(now))
            .map(|s| s.clone())
            .collect()
    }

    /// Total number of session records.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}
