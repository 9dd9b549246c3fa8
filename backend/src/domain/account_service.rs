//! Account services: login, signup and profile maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    AccountChanges, LoginService, NewAccount, PasswordHasher, PasswordHasherError,
    PersistenceError, UserRepository, UsersCommand, UsersQuery, constraints,
};
use crate::domain::{
    Capabilities, Error, Identity, LoginCredentials, Role, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn map_hasher_error(err: &PasswordHasherError) -> Error {
    error!(error = %err, "password hasher failure");
    Error::internal("password hashing failed")
}

fn map_write_error(err: PersistenceError) -> Error {
    match err.violated_constraint() {
        Some(constraints::USER_EMAIL) => Error::conflict("email already registered"),
        Some(constraints::USER_NATIONAL_ID) => Error::conflict("CPF already registered"),
        _ => err.into_domain("account already exists"),
    }
}

/// Service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Create the service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn register(&self, account: NewAccount, role: Role) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&account.password)
            .map_err(|err| map_hasher_error(&err))?;
        let user = User {
            id: UserId::random(),
            email: account.email,
            password_hash,
            role,
            name: account.name,
            national_id: account.national_id,
            created_at: self.clock.utc(),
            last_access: None,
        };
        self.users.insert(&user).await.map_err(map_write_error)?;
        info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    /// Create an administrator without an authenticated caller.
    ///
    /// Only operator tooling reaches this; the HTTP surface always goes
    /// through [`UsersCommand::sign_up`].
    pub async fn bootstrap_admin(&self, account: NewAccount) -> Result<User, Error> {
        self.register(account, Role::Admin).await
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(mut user) = self.users.find_by_email(credentials.email()).await? else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(|err| map_hasher_error(&err))?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let now = self.clock.utc();
        self.users.record_access(&user.id, now).await?;
        user.last_access = Some(now);
        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(user)
    }
}

#[async_trait]
impl UsersCommand for AccountService {
    async fn sign_up(&self, caller: Option<Identity>, account: NewAccount) -> Result<User, Error> {
        let role = account.role.unwrap_or(Role::Participant);
        let may_assign_roles =
            caller.is_some_and(|identity| Capabilities::for_identity(identity).manage_users);
        if role != Role::Participant && !may_assign_roles {
            return Err(Error::forbidden("only administrators can assign roles"));
        }

        self.register(account, role).await
    }

    async fn update_user(
        &self,
        caller: Identity,
        id: UserId,
        changes: AccountChanges,
    ) -> Result<User, Error> {
        let caps = Capabilities::for_identity(caller);
        let is_self = caller.user_id == id;
        if !is_self && !caps.manage_users {
            return Err(Error::forbidden("not allowed to change this account"));
        }
        if changes.role.is_some() && !caps.manage_users {
            return Err(Error::forbidden("only administrators can assign roles"));
        }

        let mut user = self.load(&id).await?;
        if let Some(new_password) = &changes.new_password {
            if is_self {
                let current = changes.current_password.as_ref().ok_or_else(|| {
                    Error::invalid_request("current password is required to set a new one")
                })?;
                let matches = self
                    .hasher
                    .verify(current, &user.password_hash)
                    .map_err(|err| map_hasher_error(&err))?;
                if !matches {
                    return Err(Error::invalid_request("current password is incorrect"));
                }
            }
            user.password_hash = self
                .hasher
                .hash(new_password)
                .map_err(|err| map_hasher_error(&err))?;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        if let Some(national_id) = changes.national_id {
            user.national_id = Some(national_id);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }

        self.users.update(&user).await.map_err(map_write_error)?;
        Ok(user)
    }

    async fn delete_user(&self, caller: Identity, id: UserId) -> Result<(), Error> {
        if !Capabilities::for_identity(caller).manage_users {
            return Err(Error::forbidden("only administrators can delete accounts"));
        }
        if caller.user_id == id {
            return Err(Error::invalid_request(
                "administrators cannot delete their own account",
            ));
        }
        if !self.users.delete(&id).await? {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %id, deleted_by = %caller.user_id, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl UsersQuery for AccountService {
    async fn current_user(&self, caller: Identity) -> Result<User, Error> {
        self.users
            .find_by_id(&caller.user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }

    async fn list_users(&self, caller: Identity) -> Result<Vec<User>, Error> {
        if !Capabilities::for_identity(caller).manage_users {
            return Err(Error::forbidden("only administrators can list accounts"));
        }
        Ok(self.users.list().await?)
    }

    async fn get_user(&self, caller: Identity, id: UserId) -> Result<User, Error> {
        if caller.user_id != id && !Capabilities::for_identity(caller).manage_users {
            return Err(Error::forbidden("not allowed to view this account"));
        }
        self.load(&id).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
