//! Driving ports for authentication and account management.

use async_trait::async_trait;

use crate::domain::{
    Email, Error, Identity, LoginCredentials, NationalId, Password, PersonName, Role, User, UserId,
};

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Login email.
    pub email: Email,
    /// Initial password.
    pub password: Password,
    /// Optional display name.
    pub name: Option<PersonName>,
    /// Optional CPF.
    pub national_id: Option<NationalId>,
    /// Requested role; `None` means participant.
    pub role: Option<Role>,
}

/// Validated profile changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    /// New email.
    pub email: Option<Email>,
    /// New display name.
    pub name: Option<PersonName>,
    /// New CPF.
    pub national_id: Option<NationalId>,
    /// New role (admins only).
    pub role: Option<Role>,
    /// New password.
    pub new_password: Option<Password>,
    /// Current password, required when users change their own password.
    pub current_password: Option<Password>,
}

/// Domain use-case port for verifying credentials.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials, record the access and return the account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

/// Domain use-case port for account changes.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register an account. `caller` is set when an authenticated user
    /// creates the account on someone's behalf.
    async fn sign_up(&self, caller: Option<Identity>, account: NewAccount) -> Result<User, Error>;

    /// Change an account.
    async fn update_user(
        &self,
        caller: Identity,
        id: UserId,
        changes: AccountChanges,
    ) -> Result<User, Error>;

    /// Delete an account.
    async fn delete_user(&self, caller: Identity, id: UserId) -> Result<(), Error>;
}

/// Domain use-case port for reading accounts.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// The caller's own account.
    async fn current_user(&self, caller: Identity) -> Result<User, Error>;

    /// Every account (admins only).
    async fn list_users(&self, caller: Identity) -> Result<Vec<User>, Error>;

    /// One account (self or admin).
    async fn get_user(&self, caller: Identity, id: UserId) -> Result<User, Error>;
}
