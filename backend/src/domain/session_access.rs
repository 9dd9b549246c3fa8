//! Per-session visibility and management checks shared by the services.
//!
//! List queries push [`SessionScope`] down to the repositories; these helpers
//! answer the same question for a single, already loaded session.

use crate::domain::ports::{CommunityRepository, PersistenceError, SessionRepository};
use crate::domain::{Capabilities, Error, SessionId, SessionScope, UserId, VotingSession};

async fn managed_by(
    communities: &dyn CommunityRepository,
    session: &VotingSession,
    user: UserId,
) -> Result<bool, PersistenceError> {
    if session.creator_id == user {
        return Ok(true);
    }
    let Some(community_id) = session.community_id else {
        return Ok(false);
    };
    Ok(communities
        .find_by_id(&community_id)
        .await?
        .is_some_and(|community| community.creator_id == user))
}

/// Whether `caps` may see `session`.
pub(crate) async fn can_see_session(
    communities: &dyn CommunityRepository,
    caps: &Capabilities,
    session: &VotingSession,
) -> Result<bool, PersistenceError> {
    match caps.sessions {
        SessionScope::All => Ok(true),
        SessionScope::ManagedBy(user) => managed_by(communities, session, user).await,
        SessionScope::MemberOf(user) => match session.community_id {
            None => Ok(false),
            Some(community_id) => communities.is_member(&community_id, &user).await,
        },
    }
}

/// Whether `caps` may add, change or remove projects of `session`.
pub(crate) async fn can_manage_session(
    communities: &dyn CommunityRepository,
    caps: &Capabilities,
    session: &VotingSession,
) -> Result<bool, PersistenceError> {
    if !caps.create_sessions {
        return Ok(false);
    }
    if caps.is_admin() {
        return Ok(true);
    }
    managed_by(communities, session, caps.identity.user_id).await
}

/// Load a session, failing with 404 when absent and 403 when hidden.
pub(crate) async fn load_visible_session(
    sessions: &dyn SessionRepository,
    communities: &dyn CommunityRepository,
    caps: &Capabilities,
    id: &SessionId,
) -> Result<VotingSession, Error> {
    let session = sessions
        .find_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("session not found"))?;
    if !can_see_session(communities, caps, &session).await? {
        return Err(Error::forbidden("not allowed to access this session"));
    }
    Ok(session)
}
