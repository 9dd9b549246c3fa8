//! Projects: the options voters choose between within a session.

use chrono::{DateTime, Utc};

use super::{ProjectId, SessionId, Title};

/// A candidate option belonging to exactly one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Identifier.
    pub id: ProjectId,
    /// Owning session.
    pub session_id: SessionId,
    /// Title, unique within the session.
    pub title: Title,
    /// Free-form description.
    pub description: Option<String>,
    /// Person or group proposing the project.
    pub author: Option<String>,
    /// Creation time; also the tie-break order in results.
    pub created_at: DateTime<Utc>,
}
