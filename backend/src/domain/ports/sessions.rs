//! Driving ports for voting sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CommunityId, Error, Identity, SessionId, Title, VotingSession, VotingWindow,
};

/// Validated session payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Title.
    pub title: Title,
    /// Free-form description.
    pub description: Option<String>,
    /// Voting window.
    pub window: VotingWindow,
    /// Initial active flag.
    pub active: bool,
    /// Owning community, or `None` for a global session.
    pub community_id: Option<CommunityId>,
}

/// Validated session changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionChanges {
    /// New title.
    pub title: Option<Title>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New start.
    pub starts_at: Option<DateTime<Utc>>,
    /// New end.
    pub ends_at: Option<DateTime<Utc>>,
    /// New active flag.
    pub active: Option<bool>,
}

/// Listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Only sessions with this active flag.
    pub active: Option<bool>,
    /// Only sessions in this community.
    pub community_id: Option<CommunityId>,
}

/// A session with its derived live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// The session.
    pub session: VotingSession,
    /// Whether it accepts votes at the time of the read.
    pub live: bool,
}

/// Domain use-case port for session lifecycle changes.
#[async_trait]
pub trait SessionsCommand: Send + Sync {
    /// Open a session.
    async fn create_session(
        &self,
        caller: Identity,
        session: NewSession,
    ) -> Result<SessionView, Error>;

    /// Change a session (creator or admin).
    async fn update_session(
        &self,
        caller: Identity,
        id: SessionId,
        changes: SessionChanges,
    ) -> Result<SessionView, Error>;

    /// Delete a session with its projects and votes (creator or admin).
    async fn delete_session(&self, caller: Identity, id: SessionId) -> Result<(), Error>;
}

/// Domain use-case port for reading sessions.
#[async_trait]
pub trait SessionsQuery: Send + Sync {
    /// Visible sessions matching `filter`.
    async fn list_sessions(
        &self,
        caller: Identity,
        filter: SessionFilter,
    ) -> Result<Vec<SessionView>, Error>;

    /// One visible session.
    async fn get_session(&self, caller: Identity, id: SessionId) -> Result<SessionView, Error>;
}
