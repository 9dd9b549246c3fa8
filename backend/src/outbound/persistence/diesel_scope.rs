//! Translate role visibility scopes into Diesel filters.
//!
//! Scopes depend on community ownership and membership, so each helper first
//! loads the relevant community ids and then filters with `IN (...)`.

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{SessionScope, UserId, VoteScope};

use super::diesel_helpers::map_diesel_error;
use super::schema::{communities, community_members, voting_sessions};

/// Ids of communities created by `user`.
pub(crate) async fn communities_created_by(
    conn: &mut AsyncPgConnection,
    user: &UserId,
) -> Result<Vec<Uuid>, PersistenceError> {
    communities::table
        .filter(communities::creator_id.eq(user.as_uuid()))
        .select(communities::id)
        .load(conn)
        .await
        .map_err(map_diesel_error)
}

/// Ids of communities `user` belongs to.
pub(crate) async fn communities_joined_by(
    conn: &mut AsyncPgConnection,
    user: &UserId,
) -> Result<Vec<Uuid>, PersistenceError> {
    community_members::table
        .filter(community_members::user_id.eq(user.as_uuid()))
        .select(community_members::community_id)
        .load(conn)
        .await
        .map_err(map_diesel_error)
}

/// Boxed session query restricted to `scope`.
pub(crate) async fn scoped_sessions(
    conn: &mut AsyncPgConnection,
    scope: SessionScope,
) -> Result<voting_sessions::BoxedQuery<'static, Pg>, PersistenceError> {
    let query = voting_sessions::table.into_boxed();
    Ok(match scope {
        SessionScope::All => query,
        SessionScope::ManagedBy(user) => {
            let owned = communities_created_by(conn, &user).await?;
            query.filter(
                voting_sessions::creator_id
                    .eq(*user.as_uuid())
                    .nullable()
                    .or(voting_sessions::community_id.eq_any(owned)),
            )
        }
        SessionScope::MemberOf(user) => {
            let joined = communities_joined_by(conn, &user).await?;
            query.filter(voting_sessions::community_id.eq_any(joined))
        }
    })
}

/// Ids of the sessions visible within `scope`, or `None` for every session.
pub(crate) async fn visible_session_ids(
    conn: &mut AsyncPgConnection,
    scope: SessionScope,
) -> Result<Option<Vec<Uuid>>, PersistenceError> {
    if scope == SessionScope::All {
        return Ok(None);
    }
    let ids = scoped_sessions(conn, scope)
        .await?
        .select(voting_sessions::id)
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(Some(ids))
}

/// Vote visibility resolved to concrete filters.
pub(crate) enum VoteFilterIds {
    /// No restriction.
    All,
    /// Votes in these sessions.
    Sessions(Vec<Uuid>),
    /// Votes cast by this user.
    Voter(Uuid),
}

/// Resolve a vote scope.
pub(crate) async fn vote_filter(
    conn: &mut AsyncPgConnection,
    scope: VoteScope,
) -> Result<VoteFilterIds, PersistenceError> {
    Ok(match scope {
        VoteScope::All => VoteFilterIds::All,
        VoteScope::CastBy(user) => VoteFilterIds::Voter(*user.as_uuid()),
        VoteScope::InSessionsManagedBy(user) => {
            let ids = visible_session_ids(conn, SessionScope::ManagedBy(user))
                .await?
                .unwrap_or_default();
            VoteFilterIds::Sessions(ids)
        }
    })
}
