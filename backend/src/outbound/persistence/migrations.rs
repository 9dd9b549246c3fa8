//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::PersistenceError;

/// Migrations from `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Uses a blocking connection; call it from `spawn_blocking` inside async
/// code.
///
/// # Errors
///
/// Returns [`PersistenceError::Connection`] when the database cannot be
/// reached and [`PersistenceError::Query`] when a migration fails.
pub fn run_migrations(database_url: &str) -> Result<(), PersistenceError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PersistenceError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PersistenceError::query(format!("migration failed: {err}")))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}
