//! Port abstraction for votes.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{ProjectId, SessionId, UserId, Vote, VoteId, VoteScope, VoteView};

/// Filters applied when listing votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteQuery {
    /// Role-derived visibility.
    pub scope: VoteScope,
    /// Only votes in this session.
    pub session_id: Option<SessionId>,
    /// Only votes for this project.
    pub project_id: Option<ProjectId>,
}

impl VoteQuery {
    /// Everything visible within `scope`.
    #[must_use]
    pub const fn visible(scope: VoteScope) -> Self {
        Self {
            scope,
            session_id: None,
            project_id: None,
        }
    }
}

/// Persistence port for votes.
///
/// The store holds at most one vote per (user, session). A second insert
/// fails with [`PersistenceError::UniqueViolation`] naming
/// [`super::constraints::VOTE_PER_SESSION`]; concurrent inserts race and
/// exactly one wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Store a new vote.
    async fn insert(&self, vote: &Vote) -> Result<(), PersistenceError>;

    /// Overwrite the project, comment and timestamp of a vote.
    async fn update(&self, vote: &Vote) -> Result<(), PersistenceError>;

    /// Remove a vote. Returns whether it existed.
    async fn delete(&self, id: &VoteId) -> Result<bool, PersistenceError>;

    /// Fetch a vote by id, regardless of visibility.
    async fn find_by_id(&self, id: &VoteId) -> Result<Option<Vote>, PersistenceError>;

    /// Whether `user` has a vote in `session`.
    async fn has_voted(&self, user: &UserId, session: &SessionId)
    -> Result<bool, PersistenceError>;

    /// Votes matching `query` joined with voter, project and session,
    /// newest first.
    async fn list(&self, query: &VoteQuery) -> Result<Vec<VoteView>, PersistenceError>;

    /// Vote count per project of a session; projects without votes are
    /// omitted.
    async fn tally(&self, session: &SessionId) -> Result<Vec<(ProjectId, u64)>, PersistenceError>;
}
