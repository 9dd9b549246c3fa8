//! Project services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CommunityRepository, NewProject, PersistenceError, ProjectChanges, ProjectQuery,
    ProjectRepository, ProjectsCommand, ProjectsQuery, SessionRepository,
};
use crate::domain::session_access::{can_manage_session, can_see_session};
use crate::domain::{Capabilities, Error, Identity, Project, ProjectId, SessionId};

fn map_write_error(err: PersistenceError) -> Error {
    err.into_domain("a project with this title already exists in the session")
}

/// Service implementing the project driving ports.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    sessions: Arc<dyn SessionRepository>,
    communities: Arc<dyn CommunityRepository>,
    clock: Arc<dyn Clock>,
}

impl ProjectService {
    /// Create the service.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        sessions: Arc<dyn SessionRepository>,
        communities: Arc<dyn CommunityRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            sessions,
            communities,
            clock,
        }
    }

    async fn ensure_manages(
        &self,
        caps: &Capabilities,
        session_id: &SessionId,
    ) -> Result<(), Error> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| Error::not_found("session not found"))?;
        if !can_manage_session(self.communities.as_ref(), caps, &session).await? {
            return Err(Error::forbidden(
                "not allowed to manage projects of this session",
            ));
        }
        Ok(())
    }

    async fn load(&self, id: &ProjectId) -> Result<Project, Error> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("project not found"))
    }
}

#[async_trait]
impl ProjectsCommand for ProjectService {
    async fn create_project(
        &self,
        caller: Identity,
        project: NewProject,
    ) -> Result<Project, Error> {
        let caps = Capabilities::for_identity(caller);
        if !caps.create_sessions {
            return Err(Error::forbidden(
                "only managers and administrators can create projects",
            ));
        }
        self.ensure_manages(&caps, &project.session_id).await?;

        let created = Project {
            id: ProjectId::random(),
            session_id: project.session_id,
            title: project.title,
            description: project.description,
            author: project.author,
            created_at: self.clock.utc(),
        };
        self.projects
            .insert(&created)
            .await
            .map_err(map_write_error)?;
        info!(project_id = %created.id, session_id = %created.session_id, "project created");
        Ok(created)
    }

    async fn update_project(
        &self,
        caller: Identity,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Project, Error> {
        let caps = Capabilities::for_identity(caller);
        let mut project = self.load(&id).await?;
        self.ensure_manages(&caps, &project.session_id).await?;
        if let Some(title) = changes.title {
            project.title = title;
        }
        if let Some(description) = changes.description {
            project.description = description;
        }
        if let Some(author) = changes.author {
            project.author = author;
        }
        self.projects
            .update(&project)
            .await
            .map_err(map_write_error)?;
        Ok(project)
    }

    async fn delete_project(&self, caller: Identity, id: ProjectId) -> Result<(), Error> {
        let caps = Capabilities::for_identity(caller);
        let project = self.load(&id).await?;
        self.ensure_manages(&caps, &project.session_id).await?;
        if !self.projects.delete(&id).await? {
            return Err(Error::not_found("project not found"));
        }
        info!(project_id = %id, deleted_by = %caller.user_id, "project deleted");
        Ok(())
    }
}

#[async_trait]
impl ProjectsQuery for ProjectService {
    async fn list_projects(
        &self,
        caller: Identity,
        session_id: Option<SessionId>,
    ) -> Result<Vec<Project>, Error> {
        let caps = Capabilities::for_identity(caller);
        let query = ProjectQuery {
            scope: caps.sessions,
            session_id,
        };
        Ok(self.projects.list(&query).await?)
    }

    async fn get_project(&self, caller: Identity, id: ProjectId) -> Result<Project, Error> {
        let caps = Capabilities::for_identity(caller);
        let project = self.load(&id).await?;
        let session = self
            .sessions
            .find_by_id(&project.session_id)
            .await?
            .ok_or_else(|| Error::not_found("project not found"))?;
        if !can_see_session(self.communities.as_ref(), &caps, &session).await? {
            return Err(Error::forbidden("not allowed to access this project"));
        }
        Ok(project)
    }
}
