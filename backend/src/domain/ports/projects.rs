//! Driving ports for projects.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Project, ProjectId, SessionId, Title};

/// Validated project payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Owning session.
    pub session_id: SessionId,
    /// Title, unique within the session.
    pub title: Title,
    /// Free-form description.
    pub description: Option<String>,
    /// Proposer.
    pub author: Option<String>,
}

/// Validated project changes. `None` leaves a field untouched and
/// `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    /// New title.
    pub title: Option<Title>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New proposer.
    pub author: Option<Option<String>>,
}

/// Domain use-case port for project changes.
#[async_trait]
pub trait ProjectsCommand: Send + Sync {
    /// Add a project to a session the caller manages.
    async fn create_project(&self, caller: Identity, project: NewProject)
    -> Result<Project, Error>;

    /// Change a project in a session the caller manages.
    async fn update_project(
        &self,
        caller: Identity,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project, Error>;

    /// Delete a project and its votes.
    async fn delete_project(&self, caller: Identity, id: ProjectId) -> Result<(), Error>;
}

/// Domain use-case port for reading projects.
#[async_trait]
pub trait ProjectsQuery: Send + Sync {
    /// Visible projects, optionally of one session.
    async fn list_projects(
        &self,
        caller: Identity,
        session_id: Option<SessionId>,
    ) -> Result<Vec<Project>, Error>;

    /// One visible project.
    async fn get_project(&self, caller: Identity, id: ProjectId) -> Result<Project, Error>;
}
