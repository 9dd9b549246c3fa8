//! Read-only aggregates: masked vote reports and the dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    DashboardQuery, ProjectQuery, ProjectRepository, ReportsQuery, SessionQuery,
    SessionRepository, UserRepository, VoteQuery, VoteRepository,
};
use crate::domain::{
    Capabilities, DashboardStats, Error, Identity, SessionId, SessionReport, build_dashboard,
    build_vote_report,
};

/// Service implementing the report and dashboard driving ports.
#[derive(Clone)]
pub struct InsightService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    projects: Arc<dyn ProjectRepository>,
    votes: Arc<dyn VoteRepository>,
    clock: Arc<dyn Clock>,
}

impl InsightService {
    /// Create the service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        projects: Arc<dyn ProjectRepository>,
        votes: Arc<dyn VoteRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            sessions,
            projects,
            votes,
            clock,
        }
    }
}

#[async_trait]
impl ReportsQuery for InsightService {
    async fn vote_report(
        &self,
        caller: Identity,
        session_id: Option<SessionId>,
    ) -> Result<Vec<SessionReport>, Error> {
        let caps = Capabilities::for_identity(caller);
        if !caps.view_reports {
            return Err(Error::forbidden(
                "only managers and administrators can read reports",
            ));
        }
        let sessions = self
            .sessions
            .list(&SessionQuery {
                session_id,
                ..SessionQuery::visible(caps.sessions)
            })
            .await?;
        if session_id.is_some() && sessions.is_empty() {
            return Err(Error::not_found("session not found"));
        }
        let projects = self
            .projects
            .list(&ProjectQuery {
                scope: caps.sessions,
                session_id,
            })
            .await?;
        let votes = self
            .votes
            .list(&VoteQuery {
                session_id,
                ..VoteQuery::visible(caps.votes)
            })
            .await?;
        Ok(build_vote_report(sessions, &projects, &votes))
    }
}

#[async_trait]
impl DashboardQuery for InsightService {
    async fn dashboard(&self, caller: Identity) -> Result<DashboardStats, Error> {
        let caps = Capabilities::for_identity(caller);
        let user_count = if caps.manage_users {
            Some(self.users.list().await?.len())
        } else {
            None
        };
        let sessions = self
            .sessions
            .list(&SessionQuery::visible(caps.sessions))
            .await?;
        let projects = self
            .projects
            .list(&ProjectQuery {
                scope: caps.sessions,
                session_id: None,
            })
            .await?;
        let votes = self.votes.list(&VoteQuery::visible(caps.votes)).await?;
        Ok(build_dashboard(
            self.clock.utc(),
            user_count,
            sessions,
            projects,
            &votes,
        ))
    }
}
