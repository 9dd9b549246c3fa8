//! Builders shared by the service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Community, CommunityId, CommunityName, Email, Identity, InviteCode, PasswordHash, Project,
    ProjectId, Role, SessionId, Title, User, UserId, VotingSession, VotingWindow,
};

/// Clock frozen at a fixed instant.
pub(crate) struct FixtureClock {
    now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Noon on 10 March 2026, the "now" of every service test.
pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock { now: now() })
}

pub(crate) fn identity(role: Role) -> Identity {
    Identity::new(UserId::random(), role)
}

pub(crate) fn user(id: UserId, role: Role, hash: &str) -> User {
    User {
        id,
        email: Email::new(format!("{id}@example.com")).expect("email"),
        password_hash: PasswordHash::new(hash),
        role,
        name: None,
        national_id: None,
        created_at: now(),
        last_access: None,
    }
}

pub(crate) fn community(creator: UserId) -> Community {
    Community {
        id: CommunityId::random(),
        name: CommunityName::new("Jardim das Flores").expect("name"),
        description: None,
        invite_code: InviteCode::from_bytes([0xca, 0xfe, 0x00, 0x01]),
        creator_id: creator,
        created_at: now(),
    }
}

/// A session open from an hour ago until an hour from now.
pub(crate) fn live_session(creator: UserId, community_id: Option<CommunityId>) -> VotingSession {
    VotingSession {
        id: SessionId::random(),
        title: Title::new("Orçamento participativo").expect("title"),
        description: None,
        window: VotingWindow::new(now() - Duration::hours(1), now() + Duration::hours(1))
            .expect("window"),
        active: true,
        community_id,
        creator_id: creator,
        created_at: now() - Duration::days(1),
    }
}

pub(crate) fn project(session_id: SessionId, title: &str) -> Project {
    Project {
        id: ProjectId::random(),
        session_id,
        title: Title::new(title).expect("title"),
        description: None,
        author: None,
        created_at: now() - Duration::hours(2),
    }
}
