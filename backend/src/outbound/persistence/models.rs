//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Reading a row back goes through the
//! domain constructors again; a row that fails them is reported as a query
//! error rather than silently repaired.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Community, CommunityId, CommunityName, Email, InviteCode, NationalId, PasswordHash,
    PersonName, Project, ProjectId, Role, SessionId, Title, User, UserId, Vote, VoteId,
    VotingSession, VotingWindow,
};

use super::schema::{community_members, communities, projects, users, voting_sessions, votes};

fn invalid(table: &str, err: impl std::fmt::Display) -> String {
    format!("invalid {table} row: {err}")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_access: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: Email::new(&row.email).map_err(|err| invalid("users", err))?,
            password_hash: PasswordHash::new(row.password_hash),
            role: row.role.parse::<Role>().map_err(|err| invalid("users", err))?,
            name: row
                .name
                .map(PersonName::new)
                .transpose()
                .map_err(|err| invalid("users", err))?,
            national_id: row
                .national_id
                .map(NationalId::new)
                .transpose()
                .map_err(|err| invalid("users", err))?,
            created_at: row.created_at,
            last_access: row.last_access,
        })
    }
}

/// Insertable and changeset struct for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub name: Option<&'a str>,
    pub national_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub last_access: Option<DateTime<Utc>>,
}

impl<'a> From<&'a User> for UserRecord<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
            name: user.name.as_ref().map(PersonName::as_str),
            national_id: user.national_id.as_ref().map(NationalId::as_str),
            created_at: user.created_at,
            last_access: user.last_access,
        }
    }
}

// ---------------------------------------------------------------------------
// Communities
// ---------------------------------------------------------------------------

/// Row struct for reading from the communities table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = communities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommunityRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CommunityRow> for Community {
    type Error = String;

    fn try_from(row: CommunityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommunityId::from_uuid(row.id),
            name: CommunityName::new(&row.name).map_err(|err| invalid("communities", err))?,
            description: row.description,
            invite_code: InviteCode::parse(&row.invite_code)
                .map_err(|err| invalid("communities", err))?,
            creator_id: UserId::from_uuid(row.creator_id),
            created_at: row.created_at,
        })
    }
}

/// Insertable and changeset struct for community records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = communities)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CommunityRecord<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub invite_code: &'a str,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Community> for CommunityRecord<'a> {
    fn from(community: &'a Community) -> Self {
        Self {
            id: *community.id.as_uuid(),
            name: community.name.as_str(),
            description: community.description.as_deref(),
            invite_code: community.invite_code.as_str(),
            creator_id: *community.creator_id.as_uuid(),
            created_at: community.created_at,
        }
    }
}

/// Insertable struct for membership records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_members)]
pub(crate) struct NewMemberRow {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Voting sessions
// ---------------------------------------------------------------------------

/// Row struct for reading from the voting_sessions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = voting_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
    pub community_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for VotingSession {
    type Error = String;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SessionId::from_uuid(row.id),
            title: Title::new(&row.title).map_err(|err| invalid("voting_sessions", err))?,
            description: row.description,
            window: VotingWindow::new(row.starts_at, row.ends_at)
                .map_err(|err| invalid("voting_sessions", err))?,
            active: row.active,
            community_id: row.community_id.map(CommunityId::from_uuid),
            creator_id: UserId::from_uuid(row.creator_id),
            created_at: row.created_at,
        })
    }
}

/// Insertable and changeset struct for session records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = voting_sessions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SessionRecord<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub active: bool,
    pub community_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a VotingSession> for SessionRecord<'a> {
    fn from(session: &'a VotingSession) -> Self {
        Self {
            id: *session.id.as_uuid(),
            title: session.title.as_str(),
            description: session.description.as_deref(),
            starts_at: session.window.starts_at(),
            ends_at: session.window.ends_at(),
            active: session.active,
            community_id: session.community_id.map(|id| *id.as_uuid()),
            creator_id: *session.creator_id.as_uuid(),
            created_at: session.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Row struct for reading from the projects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = String;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProjectId::from_uuid(row.id),
            session_id: SessionId::from_uuid(row.session_id),
            title: Title::new(&row.title).map_err(|err| invalid("projects", err))?,
            description: row.description,
            author: row.author,
            created_at: row.created_at,
        })
    }
}

/// Insertable and changeset struct for project records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProjectRecord<'a> {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub author: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Project> for ProjectRecord<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            id: *project.id.as_uuid(),
            session_id: *project.session_id.as_uuid(),
            title: project.title.as_str(),
            description: project.description.as_deref(),
            author: project.author.as_deref(),
            created_at: project.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// Row struct for reading from the votes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub project_id: Uuid,
    pub comment: Option<String>,
    pub cast_at: DateTime<Utc>,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            id: VoteId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            session_id: SessionId::from_uuid(row.session_id),
            project_id: ProjectId::from_uuid(row.project_id),
            comment: row.comment,
            cast_at: row.cast_at,
        }
    }
}

/// Insertable and changeset struct for vote records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = votes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VoteRecord<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub project_id: Uuid,
    pub comment: Option<&'a str>,
    pub cast_at: DateTime<Utc>,
}

impl<'a> From<&'a Vote> for VoteRecord<'a> {
    fn from(vote: &'a Vote) -> Self {
        Self {
            id: *vote.id.as_uuid(),
            user_id: *vote.user_id.as_uuid(),
            session_id: *vote.session_id.as_uuid(),
            project_id: *vote.project_id.as_uuid(),
            comment: vote.comment.as_deref(),
            cast_at: vote.cast_at,
        }
    }
}

/// Voter columns joined into vote listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoterRow {
    pub name: Option<String>,
    pub email: String,
    pub national_id: Option<String>,
}
