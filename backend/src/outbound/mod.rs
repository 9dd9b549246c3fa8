//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a process-local store implementing every repository port,
//!   used when no database is configured
//! - **security**: Argon2 password hashing and random invite codes
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;

use std::sync::Arc;

use crate::domain::ports::{
    CommunityRepository, ProjectRepository, SessionRepository, UserRepository, VoteRepository,
};
use memory::InMemoryStore;
use persistence::{
    DbPool, DieselCommunityRepository, DieselProjectRepository, DieselSessionRepository,
    DieselUserRepository, DieselVoteRepository,
};

/// One implementation of every repository port, chosen at start-up.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub communities: Arc<dyn CommunityRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub votes: Arc<dyn VoteRepository>,
}

impl Repositories {
    /// Every port backed by one shared [`InMemoryStore`].
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            communities: store.clone(),
            sessions: store.clone(),
            projects: store.clone(),
            votes: store,
        }
    }

    /// Every port backed by PostgreSQL through `pool`.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            communities: Arc::new(DieselCommunityRepository::new(pool.clone())),
            sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
            projects: Arc::new(DieselProjectRepository::new(pool.clone())),
            votes: Arc::new(DieselVoteRepository::new(pool.clone())),
        }
    }
}
