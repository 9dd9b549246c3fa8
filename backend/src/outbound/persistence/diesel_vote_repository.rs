//! PostgreSQL-backed `VoteRepository` implementation using Diesel ORM.
//!
//! The one-vote-per-session rule lives in the `votes_user_session_key`
//! constraint. Concurrent inserts for the same (user, session) race inside
//! PostgreSQL and the loser surfaces as a unique violation.

use async_trait::async_trait;
use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PersistenceError, VoteQuery, VoteRepository};
use crate::domain::{NationalId, ProjectId, SessionId, UserId, Vote, VoteId, VoteView};

use super::diesel_helpers::{cast_count, map_diesel_error, map_pool_error};
use super::diesel_scope::{VoteFilterIds, vote_filter};
use super::models::{VoteRecord, VoteRow, VoterRow};
use super::pool::DbPool;
use super::schema::{projects, users, votes, voting_sessions};

/// Diesel-backed implementation of the `VoteRepository` port.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(
    (vote, voter, project_title, session_title): (VoteRow, VoterRow, String, String),
) -> Result<VoteView, PersistenceError> {
    let voter_national_id = voter
        .national_id
        .map(NationalId::new)
        .transpose()
        .map_err(|err| PersistenceError::query(format!("invalid users row: {err}")))?;
    Ok(VoteView {
        vote: Vote::from(vote),
        voter_name: voter.name,
        voter_email: voter.email,
        voter_national_id,
        project_title,
        session_title,
    })
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn insert(&self, vote: &Vote) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(votes::table)
            .values(&VoteRecord::from(vote))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, vote: &Vote) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(votes::table.find(vote.id.as_uuid()))
            .set(&VoteRecord::from(vote))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &VoteId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(votes::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &VoteId) -> Result<Option<Vote>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VoteRow> = votes::table
            .find(id.as_uuid())
            .select(VoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Vote::from))
    }

    async fn has_voted(
        &self,
        user: &UserId,
        session: &SessionId,
    ) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            votes::table
                .filter(votes::user_id.eq(user.as_uuid()))
                .filter(votes::session_id.eq(session.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list(&self, query: &VoteQuery) -> Result<Vec<VoteView>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut selected = votes::table
            .inner_join(users::table)
            .inner_join(projects::table)
            .inner_join(voting_sessions::table)
            .into_boxed();
        match vote_filter(&mut conn, query.scope).await? {
            VoteFilterIds::All => {}
            VoteFilterIds::Sessions(ids) => {
                selected = selected.filter(votes::session_id.eq_any(ids));
            }
            VoteFilterIds::Voter(user) => {
                selected = selected.filter(votes::user_id.eq(user));
            }
        }
        if let Some(session_id) = query.session_id {
            selected = selected.filter(votes::session_id.eq(*session_id.as_uuid()));
        }
        if let Some(project_id) = query.project_id {
            selected = selected.filter(votes::project_id.eq(*project_id.as_uuid()));
        }
        let rows: Vec<(VoteRow, VoterRow, String, String)> = selected
            .select((
                VoteRow::as_select(),
                VoterRow::as_select(),
                projects::title,
                voting_sessions::title,
            ))
            .order_by((votes::cast_at.desc(), votes::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_view).collect()
    }

    async fn tally(&self, session: &SessionId) -> Result<Vec<(ProjectId, u64)>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, i64)> = votes::table
            .filter(votes::session_id.eq(session.as_uuid()))
            .group_by(votes::project_id)
            .select((votes::project_id, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, count)| (ProjectId::from_uuid(id), cast_count(count)))
            .collect())
    }
}
