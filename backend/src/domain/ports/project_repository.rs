//! Port abstraction for projects.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{Project, ProjectId, SessionId, SessionScope};

/// Filters applied when listing projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Visibility of the owning sessions.
    pub scope: SessionScope,
    /// Only projects of this session.
    pub session_id: Option<SessionId>,
}

/// Persistence port for projects.
///
/// Titles are unique within a session; a clash fails with
/// [`PersistenceError::UniqueViolation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Store a new project.
    async fn insert(&self, project: &Project) -> Result<(), PersistenceError>;

    /// Overwrite an existing project.
    async fn update(&self, project: &Project) -> Result<(), PersistenceError>;

    /// Remove a project and its votes. Returns whether it existed.
    async fn delete(&self, id: &ProjectId) -> Result<bool, PersistenceError>;

    /// Fetch a project by id, regardless of visibility.
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, PersistenceError>;

    /// Projects matching `query`, in creation order.
    async fn list(&self, query: &ProjectQuery) -> Result<Vec<Project>, PersistenceError>;
}
