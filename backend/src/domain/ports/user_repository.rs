//! Port abstraction for account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PersistenceError;
use crate::domain::{Email, User, UserId};

/// Persistence port for user accounts.
///
/// `insert` and `update` report duplicate emails or CPFs as
/// [`PersistenceError::UniqueViolation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account.
    async fn insert(&self, user: &User) -> Result<(), PersistenceError>;

    /// Overwrite an existing account.
    async fn update(&self, user: &User) -> Result<(), PersistenceError>;

    /// Remove an account along with its memberships and votes. Returns
    /// whether it existed.
    async fn delete(&self, id: &UserId) -> Result<bool, PersistenceError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// Fetch an account by its login email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError>;

    /// Every account, oldest first.
    async fn list(&self) -> Result<Vec<User>, PersistenceError>;

    /// Record a successful login.
    async fn record_access(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;
}
