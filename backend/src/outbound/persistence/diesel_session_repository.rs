//! PostgreSQL-backed `SessionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, SessionQuery, SessionRepository};
use crate::domain::{SessionId, VotingSession};

use super::diesel_helpers::{collect_rows, convert_row, map_diesel_error, map_pool_error};
use super::diesel_scope::scoped_sessions;
use super::models::{SessionRecord, SessionRow};
use super::pool::DbPool;
use super::schema::voting_sessions;

/// Diesel-backed implementation of the `SessionRepository` port.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn insert(&self, session: &VotingSession) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(voting_sessions::table)
            .values(&SessionRecord::from(session))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, session: &VotingSession) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(voting_sessions::table.find(session.id.as_uuid()))
            .set(&SessionRecord::from(session))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(voting_sessions::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<VotingSession>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SessionRow> = voting_sessions::table
            .find(id.as_uuid())
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert_row(row)
    }

    async fn list(&self, query: &SessionQuery) -> Result<Vec<VotingSession>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut sessions = scoped_sessions(&mut conn, query.scope).await?;
        if let Some(active) = query.active {
            sessions = sessions.filter(voting_sessions::active.eq(active));
        }
        if let Some(community_id) = query.community_id {
            sessions = sessions.filter(voting_sessions::community_id.eq(*community_id.as_uuid()));
        }
        if let Some(session_id) = query.session_id {
            sessions = sessions.filter(voting_sessions::id.eq(*session_id.as_uuid()));
        }
        let rows: Vec<SessionRow> = sessions
            .select(SessionRow::as_select())
            .order_by((voting_sessions::starts_at.desc(), voting_sessions::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows)
    }
}
