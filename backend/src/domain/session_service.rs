//! Voting session lifecycle services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CommunityRepository, NewSession, SessionChanges, SessionFilter, SessionQuery,
    SessionRepository, SessionView, SessionsCommand, SessionsQuery,
};
use crate::domain::session_access::load_visible_session;
use crate::domain::{
    Capabilities, Error, Identity, SessionId, VotingSession, VotingWindow,
};

/// Service implementing the session driving ports.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    communities: Arc<dyn CommunityRepository>,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    /// Create the service.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        communities: Arc<dyn CommunityRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            communities,
            clock,
        }
    }

    fn view(&self, session: VotingSession) -> SessionView {
        SessionView {
            live: session.is_live(self.clock.utc()),
            session,
        }
    }

    async fn load_owned(&self, caps: &Capabilities, id: &SessionId) -> Result<VotingSession, Error> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("session not found"))?;
        if !caps.owns(&session.creator_id) {
            return Err(Error::forbidden(
                "only the session creator or an administrator can do this",
            ));
        }
        Ok(session)
    }

    async fn ensure_may_open_in(&self, caps: &Capabilities, session: &NewSession) -> Result<(), Error> {
        let Some(community_id) = session.community_id else {
            if caps.create_global_sessions {
                return Ok(());
            }
            return Err(Error::forbidden(
                "only administrators can create sessions outside a community",
            ));
        };
        let community = self
            .communities
            .find_by_id(&community_id)
            .await?
            .ok_or_else(|| Error::not_found("community not found"))?;
        if caps.owns(&community.creator_id) {
            return Ok(());
        }
        if self
            .communities
            .is_member(&community_id, &caps.identity.user_id)
            .await?
        {
            return Ok(());
        }
        Err(Error::forbidden(
            "not allowed to create sessions in this community",
        ))
    }
}

#[async_trait]
impl SessionsCommand for SessionService {
    async fn create_session(
        &self,
        caller: Identity,
        session: NewSession,
    ) -> Result<SessionView, Error> {
        let caps = Capabilities::for_identity(caller);
        if !caps.create_sessions {
            return Err(Error::forbidden(
                "only managers and administrators can create sessions",
            ));
        }
        self.ensure_may_open_in(&caps, &session).await?;

        let created = VotingSession {
            id: SessionId::random(),
            title: session.title,
            description: session.description,
            window: session.window,
            active: session.active,
            community_id: session.community_id,
            creator_id: caller.user_id,
            created_at: self.clock.utc(),
        };
        self.sessions.insert(&created).await?;
        info!(session_id = %created.id, creator = %caller.user_id, "session created");
        Ok(self.view(created))
    }

    async fn update_session(
        &self,
        caller: Identity,
        id: SessionId,
        changes: SessionChanges,
    ) -> Result<SessionView, Error> {
        let caps = Capabilities::for_identity(caller);
        let mut session = self.load_owned(&caps, &id).await?;

        let starts_at = changes.starts_at.unwrap_or(session.window.starts_at());
        let ends_at = changes.ends_at.unwrap_or(session.window.ends_at());
        session.window = VotingWindow::new(starts_at, ends_at)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if let Some(title) = changes.title {
            session.title = title;
        }
        if let Some(description) = changes.description {
            session.description = description;
        }
        if let Some(active) = changes.active {
            session.active = active;
        }

        self.sessions.update(&session).await?;
        info!(session_id = %id, active = session.active, "session updated");
        Ok(self.view(session))
    }

    async fn delete_session(&self, caller: Identity, id: SessionId) -> Result<(), Error> {
        let caps = Capabilities::for_identity(caller);
        self.load_owned(&caps, &id).await?;
        if !self.sessions.delete(&id).await? {
            return Err(Error::not_found("session not found"));
        }
        info!(session_id = %id, deleted_by = %caller.user_id, "session deleted");
        Ok(())
    }
}

#[async_trait]
impl SessionsQuery for SessionService {
    async fn list_sessions(
        &self,
        caller: Identity,
        filter: SessionFilter,
    ) -> Result<Vec<SessionView>, Error> {
        let caps = Capabilities::for_identity(caller);
        let query = SessionQuery {
            active: filter.active,
            community_id: filter.community_id,
            ..SessionQuery::visible(caps.sessions)
        };
        let sessions = self.sessions.list(&query).await?;
        Ok(sessions.into_iter().map(|s| self.view(s)).collect())
    }

    async fn get_session(&self, caller: Identity, id: SessionId) -> Result<SessionView, Error> {
        let caps = Capabilities::for_identity(caller);
        let session =
            load_visible_session(self.sessions.as_ref(), self.communities.as_ref(), &caps, &id)
                .await?;
        Ok(self.view(session))
    }
}

#[cfg(test)]
#[path = "session_service_tests.rs"]
mod tests;
