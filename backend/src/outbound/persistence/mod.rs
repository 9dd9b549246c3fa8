//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a shared `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Visibility scopes become SQL filters; no business rule
//!   lives here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Store-enforced uniqueness**: named unique constraints in the
//!   migrations are reported back as
//!   [`PersistenceError::UniqueViolation`](crate::domain::ports::PersistenceError).
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use votecerto::outbound::persistence::{DbPool, DieselVoteRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/votecerto")).await?;
//! let votes = DieselVoteRepository::new(pool);
//! # let _ = votes;
//! # Ok(())
//! # }
//! ```

mod diesel_community_repository;
pub(crate) mod diesel_helpers;
mod diesel_project_repository;
mod diesel_scope;
mod diesel_session_repository;
mod diesel_user_repository;
mod diesel_vote_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_community_repository::DieselCommunityRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vote_repository::DieselVoteRepository;
pub use migrations::{MIGRATIONS, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
