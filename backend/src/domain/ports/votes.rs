//! Driving ports for voting and results.

use async_trait::async_trait;

use crate::domain::{
    Error, Identity, ProjectId, SessionId, SessionResults, Vote, VoteId, VoteView,
};

/// A vote attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVote {
    /// Target session.
    pub session_id: SessionId,
    /// Chosen project.
    pub project_id: ProjectId,
    /// Optional remark, already normalised.
    pub comment: Option<String>,
}

/// Changes to an existing vote. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteChanges {
    /// New project within the same session.
    pub project_id: Option<ProjectId>,
    /// New remark; `Some(None)` clears it.
    pub comment: Option<Option<String>>,
}

/// A stored vote with the titles it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    /// The vote.
    pub vote: Vote,
    /// Chosen project's title.
    pub project_title: String,
    /// Session title.
    pub session_title: String,
}

/// Listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteFilter {
    /// Only votes in this session.
    pub session_id: Option<SessionId>,
    /// Only votes for this project.
    pub project_id: Option<ProjectId>,
}

/// Domain use-case port for casting and maintaining votes.
#[async_trait]
pub trait VotesCommand: Send + Sync {
    /// Cast the caller's single vote in a session.
    async fn cast_vote(&self, caller: Identity, vote: CastVote) -> Result<VoteReceipt, Error>;

    /// Change the caller's own vote while the session is live.
    async fn update_vote(
        &self,
        caller: Identity,
        id: VoteId,
        changes: VoteChanges,
    ) -> Result<VoteReceipt, Error>;

    /// Withdraw a vote: its owner while the session is live, or an admin.
    async fn retract_vote(&self, caller: Identity, id: VoteId) -> Result<(), Error>;
}

/// Domain use-case port for reading votes and results.
#[async_trait]
pub trait VotesQuery: Send + Sync {
    /// Visible votes matching `filter`.
    async fn list_votes(&self, caller: Identity, filter: VoteFilter)
    -> Result<Vec<VoteView>, Error>;

    /// One visible vote.
    async fn get_vote(&self, caller: Identity, id: VoteId) -> Result<VoteView, Error>;

    /// Per-project results of a session.
    async fn session_results(
        &self,
        caller: Identity,
        session_id: SessionId,
    ) -> Result<SessionResults, Error>;
}
