//! Vote casting, maintenance and results.
//!
//! Casting checks eligibility in a fixed order so callers always get the
//! most specific error first: role, session existence, live window,
//! community membership, project ownership. The one-vote rule is left to
//! the store's uniqueness constraint.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CastVote, CommunityRepository, ProjectQuery, ProjectRepository, SessionRepository,
    VoteChanges, VoteFilter, VoteQuery, VoteReceipt, VoteRepository, VotesCommand, VotesQuery,
};
use crate::domain::session_access::can_see_session;
use crate::domain::{
    Capabilities, Error, Identity, Project, ProjectId, SessionId, SessionResults, SessionScope,
    Vote, VoteId, VoteView, VotingSession, aggregate_results,
};

/// Service implementing the vote driving ports.
#[derive(Clone)]
pub struct VoteService {
    votes: Arc<dyn VoteRepository>,
    sessions: Arc<dyn SessionRepository>,
    projects: Arc<dyn ProjectRepository>,
    communities: Arc<dyn CommunityRepository>,
    clock: Arc<dyn Clock>,
}

impl VoteService {
    /// Create the service.
    pub fn new(
        votes: Arc<dyn VoteRepository>,
        sessions: Arc<dyn SessionRepository>,
        projects: Arc<dyn ProjectRepository>,
        communities: Arc<dyn CommunityRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            votes,
            sessions,
            projects,
            communities,
            clock,
        }
    }

    async fn live_session(&self, id: &SessionId) -> Result<VotingSession, Error> {
        let session = self
            .sessions
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("session not found"))?;
        if !session.is_live(self.clock.utc()) {
            return Err(Error::invalid_request("session not active"));
        }
        Ok(session)
    }

    async fn project_in(&self, session: &VotingSession, id: &ProjectId) -> Result<Project, Error> {
        self.projects
            .find_by_id(id)
            .await?
            .filter(|project| project.session_id == session.id)
            .ok_or_else(|| Error::not_found("project not found in session"))
    }

    async fn load_vote(&self, id: &VoteId) -> Result<Vote, Error> {
        self.votes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("vote not found"))
    }
}

fn receipt(vote: Vote, project: &Project, session: &VotingSession) -> VoteReceipt {
    VoteReceipt {
        vote,
        project_title: project.title.as_str().to_owned(),
        session_title: session.title.as_str().to_owned(),
    }
}

#[async_trait]
impl VotesCommand for VoteService {
    async fn cast_vote(&self, caller: Identity, vote: CastVote) -> Result<VoteReceipt, Error> {
        let caps = Capabilities::for_identity(caller);
        if !caps.cast_votes {
            return Err(Error::forbidden("only participants can vote"));
        }
        let session = self.live_session(&vote.session_id).await?;
        if let Some(community_id) = session.community_id {
            if !self
                .communities
                .is_member(&community_id, &caller.user_id)
                .await?
            {
                return Err(Error::forbidden("not a member"));
            }
        }
        let project = self.project_in(&session, &vote.project_id).await?;

        let cast = Vote {
            id: VoteId::random(),
            user_id: caller.user_id,
            session_id: session.id,
            project_id: project.id,
            comment: vote.comment,
            cast_at: self.clock.utc(),
        };
        self.votes
            .insert(&cast)
            .await
            .map_err(|err| err.into_domain("already voted"))?;
        info!(
            vote_id = %cast.id,
            session_id = %cast.session_id,
            project_id = %cast.project_id,
            "vote cast"
        );
        Ok(receipt(cast, &project, &session))
    }

    async fn update_vote(
        &self,
        caller: Identity,
        id: VoteId,
        changes: VoteChanges,
    ) -> Result<VoteReceipt, Error> {
        let mut vote = self.load_vote(&id).await?;
        if vote.user_id != caller.user_id {
            return Err(Error::forbidden("only the voter can change this vote"));
        }
        let session = self.live_session(&vote.session_id).await?;
        let project_id = changes.project_id.unwrap_or(vote.project_id);
        let project = self.project_in(&session, &project_id).await?;

        vote.project_id = project.id;
        if let Some(comment) = changes.comment {
            vote.comment = comment;
        }
        vote.cast_at = self.clock.utc();
        self.votes.update(&vote).await?;
        info!(vote_id = %id, project_id = %vote.project_id, "vote changed");
        Ok(receipt(vote, &project, &session))
    }

    async fn retract_vote(&self, caller: Identity, id: VoteId) -> Result<(), Error> {
        let caps = Capabilities::for_identity(caller);
        let vote = self.load_vote(&id).await?;
        if !caps.is_admin() {
            if vote.user_id != caller.user_id {
                return Err(Error::forbidden("only the voter can retract this vote"));
            }
            self.live_session(&vote.session_id).await?;
        }
        if !self.votes.delete(&id).await? {
            return Err(Error::not_found("vote not found"));
        }
        info!(vote_id = %id, retracted_by = %caller.user_id, "vote retracted");
        Ok(())
    }
}

#[async_trait]
impl VotesQuery for VoteService {
    async fn list_votes(
        &self,
        caller: Identity,
        filter: VoteFilter,
    ) -> Result<Vec<VoteView>, Error> {
        let caps = Capabilities::for_identity(caller);
        let query = VoteQuery {
            session_id: filter.session_id,
            project_id: filter.project_id,
            ..VoteQuery::visible(caps.votes)
        };
        Ok(self.votes.list(&query).await?)
    }

    async fn get_vote(&self, caller: Identity, id: VoteId) -> Result<VoteView, Error> {
        let caps = Capabilities::for_identity(caller);
        let vote = self.load_vote(&id).await?;
        let query = VoteQuery {
            session_id: Some(vote.session_id),
            project_id: Some(vote.project_id),
            ..VoteQuery::visible(caps.votes)
        };
        self.votes
            .list(&query)
            .await?
            .into_iter()
            .find(|view| view.vote.id == id)
            .ok_or_else(|| Error::forbidden("not allowed to access this vote"))
    }

    async fn session_results(
        &self,
        caller: Identity,
        session_id: SessionId,
    ) -> Result<SessionResults, Error> {
        let caps = Capabilities::for_identity(caller);
        let session = self
            .sessions
            .find_by_id(&session_id)
            .await?
            .ok_or_else(|| Error::not_found("session not found"))?;
        if !can_see_session(self.communities.as_ref(), &caps, &session).await? {
            return Err(Error::forbidden("not allowed to access this session"));
        }
        if caps.results_require_vote
            && !self.votes.has_voted(&caller.user_id, &session_id).await?
        {
            return Err(Error::forbidden(
                "results are available after voting in this session",
            ));
        }

        let projects = self
            .projects
            .list(&ProjectQuery {
                scope: SessionScope::All,
                session_id: Some(session_id),
            })
            .await?;
        let tallies = self.votes.tally(&session_id).await?;
        debug!(session_id = %session_id, projects = projects.len(), "aggregating results");
        Ok(aggregate_results(
            session_id,
            session.title.as_str(),
            &projects,
            &tallies,
        ))
    }
}

#[cfg(test)]
#[path = "vote_service_tests.rs"]
mod tests;
