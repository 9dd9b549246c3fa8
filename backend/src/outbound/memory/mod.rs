//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the integration tests.
//! All tables sit behind one mutex, so each repository call checks and
//! writes atomically: two concurrent duplicate votes serialise on the lock
//! and the second fails with the same constraint name PostgreSQL reports.
//! Deletes cascade exactly like the `ON DELETE CASCADE` foreign keys.

mod repositories;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{PersistenceError, constraints};
use crate::domain::{
    Community, CommunityId, Membership, Project, ProjectId, SessionId, SessionScope, User,
    UserId, Vote, VoteId, VoteScope, VotingSession,
};

/// Process-local store; contents vanish with the process.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, PersistenceError> {
        self.tables
            .lock()
            .map_err(|_| PersistenceError::connection("in-memory store lock poisoned"))
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    communities: HashMap<CommunityId, Community>,
    memberships: Vec<Membership>,
    sessions: HashMap<SessionId, VotingSession>,
    projects: HashMap<ProjectId, Project>,
    votes: HashMap<VoteId, Vote>,
}

fn violation(constraint: &str) -> PersistenceError {
    PersistenceError::unique_violation(constraint)
}

fn missing_reference(what: &str) -> PersistenceError {
    PersistenceError::query(format!("foreign key violation: unknown {what}"))
}

impl Tables {
    fn check_user(&self, user: &User) -> Result<(), PersistenceError> {
        let others = self.users.values().filter(|u| u.id != user.id);
        for other in others {
            if other.email == user.email {
                return Err(violation(constraints::USER_EMAIL));
            }
            if user.national_id.is_some() && other.national_id == user.national_id {
                return Err(violation(constraints::USER_NATIONAL_ID));
            }
        }
        Ok(())
    }

    fn check_community(&self, community: &Community) -> Result<(), PersistenceError> {
        if !self.users.contains_key(&community.creator_id) {
            return Err(missing_reference("creator"));
        }
        let others = self.communities.values().filter(|c| c.id != community.id);
        for other in others {
            if other.name == community.name {
                return Err(violation(constraints::COMMUNITY_NAME));
            }
            if other.invite_code == community.invite_code {
                return Err(violation(constraints::COMMUNITY_INVITE_CODE));
            }
        }
        Ok(())
    }

    fn check_session(&self, session: &VotingSession) -> Result<(), PersistenceError> {
        if !self.users.contains_key(&session.creator_id) {
            return Err(missing_reference("creator"));
        }
        if let Some(community_id) = session.community_id {
            if !self.communities.contains_key(&community_id) {
                return Err(missing_reference("community"));
            }
        }
        Ok(())
    }

    fn check_project(&self, project: &Project) -> Result<(), PersistenceError> {
        if !self.sessions.contains_key(&project.session_id) {
            return Err(missing_reference("session"));
        }
        let clash = self.projects.values().any(|p| {
            p.id != project.id && p.session_id == project.session_id && p.title == project.title
        });
        if clash {
            return Err(violation(constraints::PROJECT_TITLE));
        }
        Ok(())
    }

    fn check_vote(&self, vote: &Vote) -> Result<(), PersistenceError> {
        if !self.users.contains_key(&vote.user_id) {
            return Err(missing_reference("user"));
        }
        if !self.sessions.contains_key(&vote.session_id) {
            return Err(missing_reference("session"));
        }
        if !self.projects.contains_key(&vote.project_id) {
            return Err(missing_reference("project"));
        }
        let clash = self.votes.values().any(|v| {
            v.id != vote.id && v.user_id == vote.user_id && v.session_id == vote.session_id
        });
        if clash {
            return Err(violation(constraints::VOTE_PER_SESSION));
        }
        Ok(())
    }

    fn is_member(&self, community: CommunityId, user: UserId) -> bool {
        self.memberships
            .iter()
            .any(|m| m.community_id == community && m.user_id == user)
    }

    fn managed_by(&self, session: &VotingSession, user: UserId) -> bool {
        session.creator_id == user
            || session
                .community_id
                .and_then(|id| self.communities.get(&id))
                .is_some_and(|community| community.creator_id == user)
    }

    fn session_visible(&self, scope: SessionScope, session: &VotingSession) -> bool {
        match scope {
            SessionScope::All => true,
            SessionScope::ManagedBy(user) => self.managed_by(session, user),
            SessionScope::MemberOf(user) => session
                .community_id
                .is_some_and(|community| self.is_member(community, user)),
        }
    }

    fn vote_visible(&self, scope: VoteScope, vote: &Vote) -> bool {
        match scope {
            VoteScope::All => true,
            VoteScope::CastBy(user) => vote.user_id == user,
            VoteScope::InSessionsManagedBy(user) => self
                .sessions
                .get(&vote.session_id)
                .is_some_and(|session| self.managed_by(session, user)),
        }
    }

    fn delete_project(&mut self, id: ProjectId) -> bool {
        self.votes.retain(|_, vote| vote.project_id != id);
        self.projects.remove(&id).is_some()
    }

    fn delete_session(&mut self, id: SessionId) -> bool {
        self.votes.retain(|_, vote| vote.session_id != id);
        self.projects.retain(|_, project| project.session_id != id);
        self.sessions.remove(&id).is_some()
    }

    fn delete_community(&mut self, id: CommunityId) -> bool {
        let sessions: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|session| session.community_id == Some(id))
            .map(|session| session.id)
            .collect();
        for session in sessions {
            self.delete_session(session);
        }
        self.memberships.retain(|m| m.community_id != id);
        self.communities.remove(&id).is_some()
    }

    fn delete_user(&mut self, id: UserId) -> bool {
        let communities: Vec<CommunityId> = self
            .communities
            .values()
            .filter(|community| community.creator_id == id)
            .map(|community| community.id)
            .collect();
        for community in communities {
            self.delete_community(community);
        }
        let sessions: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|session| session.creator_id == id)
            .map(|session| session.id)
            .collect();
        for session in sessions {
            self.delete_session(session);
        }
        self.votes.retain(|_, vote| vote.user_id != id);
        self.memberships.retain(|m| m.user_id != id);
        self.users.remove(&id).is_some()
    }
}
