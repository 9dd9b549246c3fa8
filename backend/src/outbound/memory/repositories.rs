//! Port implementations over the shared [`InMemoryStore`] tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommunityRepository, PersistenceError, ProjectQuery, ProjectRepository, SessionQuery,
    SessionRepository, UserRepository, VoteQuery, VoteRepository, constraints,
};
use crate::domain::{
    Community, CommunityId, CommunityScope, CommunitySummary, Email, InviteCode, Member,
    Membership, Project, ProjectId, SessionId, User, UserId, Vote, VoteId, VoteView,
    VotingSession,
};

use super::{InMemoryStore, Tables, missing_reference, violation};

fn not_found(what: &str) -> PersistenceError {
    PersistenceError::query(format!("{what} does not exist"))
}

impl Tables {
    fn summarise(&self, community: &Community) -> CommunitySummary {
        let member_count = self
            .memberships
            .iter()
            .filter(|m| m.community_id == community.id)
            .count();
        let session_count = self
            .sessions
            .values()
            .filter(|s| s.community_id == Some(community.id))
            .count();
        CommunitySummary {
            community: community.clone(),
            member_count: member_count as u64,
            session_count: session_count as u64,
        }
    }

    fn view(&self, vote: &Vote) -> Option<VoteView> {
        let voter = self.users.get(&vote.user_id)?;
        let project = self.projects.get(&vote.project_id)?;
        let session = self.sessions.get(&vote.session_id)?;
        Some(VoteView {
            vote: vote.clone(),
            voter_name: voter.name.as_ref().map(|n| n.as_str().to_owned()),
            voter_email: voter.email.as_str().to_owned(),
            voter_national_id: voter.national_id.clone(),
            project_title: project.title.as_str().to_owned(),
            session_title: session.title.as_str().to_owned(),
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        tables.check_user(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&user.id) {
            return Err(not_found("user"));
        }
        tables.check_user(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.delete_user(*id))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.tables()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError> {
        let tables = self.tables()?;
        Ok(tables.users.values().find(|u| &u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, PersistenceError> {
        let tables = self.tables()?;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn record_access(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if let Some(user) = tables.users.get_mut(id) {
            user.last_access = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl CommunityRepository for InMemoryStore {
    async fn insert(&self, community: &Community) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        tables.check_community(community)?;
        tables.communities.insert(community.id, community.clone());
        Ok(())
    }

    async fn update(&self, community: &Community) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.communities.contains_key(&community.id) {
            return Err(not_found("community"));
        }
        tables.check_community(community)?;
        tables.communities.insert(community.id, community.clone());
        Ok(())
    }

    async fn delete(&self, id: &CommunityId) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.delete_community(*id))
    }

    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, PersistenceError> {
        Ok(self.tables()?.communities.get(id).cloned())
    }

    async fn find_by_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Community>, PersistenceError> {
        let tables = self.tables()?;
        Ok(tables
            .communities
            .values()
            .find(|c| &c.invite_code == code)
            .cloned())
    }

    async fn summary(
        &self,
        id: &CommunityId,
    ) -> Result<Option<CommunitySummary>, PersistenceError> {
        let tables = self.tables()?;
        Ok(tables.communities.get(id).map(|c| tables.summarise(c)))
    }

    async fn code_exists(&self, code: &InviteCode) -> Result<bool, PersistenceError> {
        let tables = self.tables()?;
        Ok(tables.communities.values().any(|c| &c.invite_code == code))
    }

    async fn list(&self, scope: CommunityScope) -> Result<Vec<CommunitySummary>, PersistenceError> {
        let tables = self.tables()?;
        let mut communities: Vec<&Community> = tables
            .communities
            .values()
            .filter(|c| match scope {
                CommunityScope::All => true,
                CommunityScope::MemberOf(user) => tables.is_member(c.id, user),
            })
            .collect();
        communities.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(communities
            .into_iter()
            .map(|c| tables.summarise(c))
            .collect())
    }

    async fn add_member(&self, membership: &Membership) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.communities.contains_key(&membership.community_id) {
            return Err(missing_reference("community"));
        }
        if !tables.users.contains_key(&membership.user_id) {
            return Err(missing_reference("user"));
        }
        if tables.is_member(membership.community_id, membership.user_id) {
            return Err(violation(constraints::MEMBERSHIP));
        }
        tables.memberships.push(membership.clone());
        Ok(())
    }

    async fn is_member(
        &self,
        community: &CommunityId,
        user: &UserId,
    ) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.is_member(*community, *user))
    }

    async fn members(&self, community: &CommunityId) -> Result<Vec<Member>, PersistenceError> {
        let tables = self.tables()?;
        let mut members: Vec<Member> = tables
            .memberships
            .iter()
            .filter(|m| &m.community_id == community)
            .filter_map(|m| {
                tables.users.get(&m.user_id).map(|user| Member {
                    user_id: user.id,
                    name: user.name.as_ref().map(|n| n.as_str().to_owned()),
                    email: user.email.as_str().to_owned(),
                    joined_at: m.joined_at,
                })
            })
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert(&self, session: &VotingSession) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        tables.check_session(session)?;
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn update(&self, session: &VotingSession) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.sessions.contains_key(&session.id) {
            return Err(not_found("session"));
        }
        tables.check_session(session)?;
        tables.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.delete_session(*id))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<VotingSession>, PersistenceError> {
        Ok(self.tables()?.sessions.get(id).cloned())
    }

    async fn list(&self, query: &SessionQuery) -> Result<Vec<VotingSession>, PersistenceError> {
        let tables = self.tables()?;
        let mut sessions: Vec<VotingSession> = tables
            .sessions
            .values()
            .filter(|s| tables.session_visible(query.scope, s))
            .filter(|s| query.active.is_none_or(|active| s.active == active))
            .filter(|s| query.community_id.is_none_or(|id| s.community_id == Some(id)))
            .filter(|s| query.session_id.is_none_or(|id| s.id == id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| {
            b.window
                .starts_at()
                .cmp(&a.window.starts_at())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn insert(&self, project: &Project) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        tables.check_project(project)?;
        tables.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.projects.contains_key(&project.id) {
            return Err(not_found("project"));
        }
        tables.check_project(project)?;
        tables.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.delete_project(*id))
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, PersistenceError> {
        Ok(self.tables()?.projects.get(id).cloned())
    }

    async fn list(&self, query: &ProjectQuery) -> Result<Vec<Project>, PersistenceError> {
        let tables = self.tables()?;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| query.session_id.is_none_or(|id| p.session_id == id))
            .filter(|p| {
                tables
                    .sessions
                    .get(&p.session_id)
                    .is_some_and(|s| tables.session_visible(query.scope, s))
            })
            .cloned()
            .collect();
        projects.sort_by_key(|p| (p.created_at, p.id));
        Ok(projects)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn insert(&self, vote: &Vote) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        tables.check_vote(vote)?;
        tables.votes.insert(vote.id, vote.clone());
        Ok(())
    }

    async fn update(&self, vote: &Vote) -> Result<(), PersistenceError> {
        let mut tables = self.tables()?;
        if !tables.votes.contains_key(&vote.id) {
            return Err(not_found("vote"));
        }
        tables.check_vote(vote)?;
        tables.votes.insert(vote.id, vote.clone());
        Ok(())
    }

    async fn delete(&self, id: &VoteId) -> Result<bool, PersistenceError> {
        Ok(self.tables()?.votes.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &VoteId) -> Result<Option<Vote>, PersistenceError> {
        Ok(self.tables()?.votes.get(id).cloned())
    }

    async fn has_voted(&self, user: &UserId, session: &SessionId) -> Result<bool, PersistenceError> {
        let tables = self.tables()?;
        Ok(tables
            .votes
            .values()
            .any(|v| &v.user_id == user && &v.session_id == session))
    }

    async fn list(&self, query: &VoteQuery) -> Result<Vec<VoteView>, PersistenceError> {
        let tables = self.tables()?;
        let mut views: Vec<VoteView> = tables
            .votes
            .values()
            .filter(|v| tables.vote_visible(query.scope, v))
            .filter(|v| query.session_id.is_none_or(|id| v.session_id == id))
            .filter(|v| query.project_id.is_none_or(|id| v.project_id == id))
            .filter_map(|v| tables.view(v))
            .collect();
        views.sort_by(|a, b| {
            b.vote
                .cast_at
                .cmp(&a.vote.cast_at)
                .then_with(|| a.vote.id.cmp(&b.vote.id))
        });
        Ok(views)
    }

    async fn tally(&self, session: &SessionId) -> Result<Vec<(ProjectId, u64)>, PersistenceError> {
        let tables = self.tables()?;
        let mut counts: Vec<(ProjectId, u64)> = Vec::new();
        for vote in tables.votes.values().filter(|v| &v.session_id == session) {
            match counts.iter_mut().find(|(id, _)| *id == vote.project_id) {
                Some((_, count)) => *count += 1,
                None => counts.push((vote.project_id, 1)),
            }
        }
        Ok(counts)
    }
}
