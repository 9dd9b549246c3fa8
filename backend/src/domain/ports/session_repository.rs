//! Port abstraction for voting sessions.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{CommunityId, SessionId, SessionScope, VotingSession};

/// Filters applied when listing sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionQuery {
    /// Role-derived visibility.
    pub scope: SessionScope,
    /// Only sessions whose active flag matches.
    pub active: Option<bool>,
    /// Only sessions of this community.
    pub community_id: Option<CommunityId>,
    /// Only this session.
    pub session_id: Option<SessionId>,
}

impl SessionQuery {
    /// Everything visible within `scope`.
    #[must_use]
    pub const fn visible(scope: SessionScope) -> Self {
        Self {
            scope,
            active: None,
            community_id: None,
            session_id: None,
        }
    }
}

/// Persistence port for voting sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Store a new session.
    async fn insert(&self, session: &VotingSession) -> Result<(), PersistenceError>;

    /// Overwrite an existing session.
    async fn update(&self, session: &VotingSession) -> Result<(), PersistenceError>;

    /// Remove a session with its projects and votes. Returns whether it
    /// existed.
    async fn delete(&self, id: &SessionId) -> Result<bool, PersistenceError>;

    /// Fetch a session by id, regardless of visibility.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<VotingSession>, PersistenceError>;

    /// Sessions matching `query`, most recent start first.
    async fn list(&self, query: &SessionQuery) -> Result<Vec<VotingSession>, PersistenceError>;
}
