//! Domain records for seeding the Diesel adapter suites.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use chrono::{Duration, DurationRound, Utc};

use votecerto::domain::ports::{CommunityRepository, SessionRepository, UserRepository};
use votecerto::domain::{
    Community, CommunityId, CommunityName, Email, InviteCode, Membership, PasswordHash, Project,
    ProjectId, Role, SessionId, Title, User, UserId, Vote, VoteId, VotingSession, VotingWindow,
};
use votecerto::outbound::Repositories;

/// Current time truncated to what a `TIMESTAMPTZ` column keeps.
pub fn now() -> chrono::DateTime<Utc> {
    Utc::now()
        .duration_trunc(Duration::microseconds(1))
        .unwrap_or_else(|_| Utc::now())
}

pub fn user(role: Role) -> User {
    let id = UserId::random();
    User {
        id,
        email: Email::new(format!("{id}@example.com")).expect("email"),
        password_hash: PasswordHash::new("hash"),
        role,
        name: None,
        national_id: None,
        created_at: now(),
        last_access: None,
    }
}

pub fn community(creator: UserId, name: &str, code: [u8; 4]) -> Community {
    Community {
        id: CommunityId::random(),
        name: CommunityName::new(name).expect("name"),
        description: None,
        invite_code: InviteCode::from_bytes(code),
        creator_id: creator,
        created_at: now(),
    }
}

pub fn session(creator: UserId, community_id: Option<CommunityId>) -> VotingSession {
    let now = now();
    VotingSession {
        id: SessionId::random(),
        title: Title::new("Orçamento participativo").expect("title"),
        description: None,
        window: VotingWindow::new(now - Duration::hours(1), now + Duration::hours(1))
            .expect("window"),
        active: true,
        community_id,
        creator_id: creator,
        created_at: now,
    }
}

pub fn project(session_id: SessionId, title: &str, age_minutes: i64) -> Project {
    Project {
        id: ProjectId::random(),
        session_id,
        title: Title::new(title).expect("title"),
        description: None,
        author: None,
        created_at: now() - Duration::minutes(age_minutes),
    }
}

pub fn vote(user_id: UserId, project: &Project) -> Vote {
    Vote {
        id: VoteId::random(),
        user_id,
        session_id: project.session_id,
        project_id: project.id,
        comment: None,
        cast_at: now(),
    }
}

pub async fn insert_user(repos: &Repositories, role: Role) -> UserId {
    let user = user(role);
    repos.users.insert(&user).await.expect("insert user");
    user.id
}

pub async fn insert_community(
    repos: &Repositories,
    creator: UserId,
    name: &str,
    code: [u8; 4],
) -> CommunityId {
    let community = community(creator, name, code);
    repos
        .communities
        .insert(&community)
        .await
        .expect("insert community");
    community.id
}

pub async fn insert_session(
    repos: &Repositories,
    creator: UserId,
    community_id: Option<CommunityId>,
) -> SessionId {
    let session = session(creator, community_id);
    repos.sessions.insert(&session).await.expect("insert session");
    session.id
}

pub async fn join(repos: &Repositories, user_id: UserId, community_id: CommunityId) {
    repos
        .communities
        .add_member(&Membership {
            user_id,
            community_id,
            joined_at: now(),
        })
        .await
        .expect("join community");
}
