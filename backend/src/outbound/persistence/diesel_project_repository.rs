//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, ProjectQuery, ProjectRepository};
use crate::domain::{Project, ProjectId};

use super::diesel_helpers::{collect_rows, convert_row, map_diesel_error, map_pool_error};
use super::diesel_scope::visible_session_ids;
use super::models::{ProjectRecord, ProjectRow};
use super::pool::DbPool;
use super::schema::projects;

/// Diesel-backed implementation of the `ProjectRepository` port.
///
/// Titles are unique per session through `projects_session_title_key`.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(projects::table)
            .values(&ProjectRecord::from(project))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, project: &Project) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(projects::table.find(project.id.as_uuid()))
            .set(&ProjectRecord::from(project))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(projects::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProjectRow> = projects::table
            .find(id.as_uuid())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        convert_row(row)
    }

    async fn list(&self, query: &ProjectQuery) -> Result<Vec<Project>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut selected = projects::table.into_boxed();
        if let Some(visible) = visible_session_ids(&mut conn, query.scope).await? {
            selected = selected.filter(projects::session_id.eq_any(visible));
        }
        if let Some(session_id) = query.session_id {
            selected = selected.filter(projects::session_id.eq(*session_id.as_uuid()));
        }
        let rows: Vec<ProjectRow> = selected
            .select(ProjectRow::as_select())
            .order_by((projects::created_at.asc(), projects::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows)
    }
}
