//! PostgreSQL-backed `CommunityRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CommunityRepository, PersistenceError};
use crate::domain::{
    Community, CommunityId, CommunityScope, CommunitySummary, InviteCode, Member, Membership,
    UserId,
};

use super::diesel_helpers::{
    cast_count, collect_rows, convert_row, map_diesel_error, map_pool_error,
};
use super::diesel_scope::communities_joined_by;
use super::models::{CommunityRecord, CommunityRow, NewMemberRow};
use super::pool::DbPool;
use super::schema::{communities, community_members, users, voting_sessions};

/// Diesel-backed implementation of the `CommunityRepository` port.
#[derive(Clone)]
pub struct DieselCommunityRepository {
    pool: DbPool,
}

impl DieselCommunityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Member and session counts for the given communities.
async fn counts(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<(HashMap<Uuid, u64>, HashMap<Uuid, u64>), PersistenceError> {
    let members: Vec<(Uuid, i64)> = community_members::table
        .filter(community_members::community_id.eq_any(ids))
        .group_by(community_members::community_id)
        .select((community_members::community_id, count_star()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let sessions: Vec<(Option<Uuid>, i64)> = voting_sessions::table
        .filter(voting_sessions::community_id.eq_any(ids))
        .group_by(voting_sessions::community_id)
        .select((voting_sessions::community_id, count_star()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let members = members
        .into_iter()
        .map(|(id, count)| (id, cast_count(count)))
        .collect();
    let sessions = sessions
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, cast_count(count))))
        .collect();
    Ok((members, sessions))
}

async fn summarise(
    conn: &mut AsyncPgConnection,
    rows: Vec<CommunityRow>,
) -> Result<Vec<CommunitySummary>, PersistenceError> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let (members, sessions) = counts(conn, &ids).await?;
    let communities: Vec<Community> = collect_rows(rows)?;
    Ok(communities
        .into_iter()
        .map(|community| {
            let id = *community.id.as_uuid();
            CommunitySummary {
                member_count: members.get(&id).copied().unwrap_or(0),
                session_count: sessions.get(&id).copied().unwrap_or(0),
                community,
            }
        })
        .collect())
}

#[async_trait]
impl CommunityRepository for DieselCommunityRepository {
    async fn insert(&self, community: &Community) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(communities::table)
            .values(&CommunityRecord::from(community))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, community: &Community) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(communities::table.find(community.id.as_uuid()))
            .set(&CommunityRecord::from(community))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &CommunityId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(communities::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommunityRow> = communities::table
            .find(id.as_uuid())
            .select(CommunityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert_row(row)
    }

    async fn find_by_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<Community>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommunityRow> = communities::table
            .filter(communities::invite_code.eq(code.as_str()))
            .select(CommunityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert_row(row)
    }

    async fn summary(
        &self,
        id: &CommunityId,
    ) -> Result<Option<CommunitySummary>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommunityRow> = communities::table
            .find(id.as_uuid())
            .select(CommunityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(summarise(&mut conn, vec![row]).await?.pop())
    }

    async fn code_exists(&self, code: &InviteCode) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            communities::table.filter(communities::invite_code.eq(code.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        scope: CommunityScope,
    ) -> Result<Vec<CommunitySummary>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = communities::table.into_boxed();
        if let CommunityScope::MemberOf(user) = scope {
            let joined = communities_joined_by(&mut conn, &user).await?;
            query = query.filter(communities::id.eq_any(joined));
        }
        let rows: Vec<CommunityRow> = query
            .select(CommunityRow::as_select())
            .order_by((communities::created_at.desc(), communities::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        summarise(&mut conn, rows).await
    }

    async fn add_member(&self, membership: &Membership) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(community_members::table)
            .values(&NewMemberRow {
                community_id: *membership.community_id.as_uuid(),
                user_id: *membership.user_id.as_uuid(),
                joined_at: membership.joined_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn is_member(
        &self,
        community: &CommunityId,
        user: &UserId,
    ) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            community_members::table
                .filter(community_members::community_id.eq(community.as_uuid()))
                .filter(community_members::user_id.eq(user.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn members(&self, community: &CommunityId) -> Result<Vec<Member>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, Option<String>, String, DateTime<Utc>)> = community_members::table
            .inner_join(users::table)
            .filter(community_members::community_id.eq(community.as_uuid()))
            .order_by(community_members::joined_at.asc())
            .select((
                users::id,
                users::name,
                users::email,
                community_members::joined_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, name, email, joined_at)| Member {
                user_id: UserId::from_uuid(id),
                name,
                email,
                joined_at,
            })
            .collect())
    }
}
