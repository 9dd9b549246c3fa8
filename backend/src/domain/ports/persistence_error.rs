//! Failure type shared by the repository ports.
//!
//! Uniqueness rules are enforced by the store itself. Adapters report a
//! rejected write as [`PersistenceError::UniqueViolation`] carrying one of
//! the constraint names in [`constraints`], and services turn that into a
//! conflict for the caller. Nothing checks uniqueness before writing.

use tracing::error;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum PersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// A statement failed.
        Query { message: String } => "repository query failed: {message}",
        /// A write broke a uniqueness rule.
        UniqueViolation { constraint: String } => "unique constraint violated: {constraint}",
    }
}

/// Names of the uniqueness rules adapters report.
pub mod constraints {
    /// One account per email.
    pub const USER_EMAIL: &str = "users_email_key";
    /// One account per CPF.
    pub const USER_NATIONAL_ID: &str = "users_national_id_key";
    /// Community names are unique.
    pub const COMMUNITY_NAME: &str = "communities_name_key";
    /// Invite codes are unique.
    pub const COMMUNITY_INVITE_CODE: &str = "communities_invite_code_key";
    /// One membership per (user, community).
    pub const MEMBERSHIP: &str = "community_members_pkey";
    /// Project titles are unique within a session.
    pub const PROJECT_TITLE: &str = "projects_session_title_key";
    /// One vote per (user, session).
    pub const VOTE_PER_SESSION: &str = "votes_user_session_key";
}

impl PersistenceError {
    /// Name of the violated constraint, if this is a uniqueness failure.
    #[must_use]
    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } => Some(constraint.as_str()),
            _ => None,
        }
    }

    /// Map to a domain error: uniqueness failures become a conflict with
    /// `conflict_message`; anything else is logged and reported as internal.
    pub(crate) fn into_domain(self, conflict_message: &str) -> Error {
        match self {
            Self::UniqueViolation { .. } => Error::conflict(conflict_message),
            other => other.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(value: PersistenceError) -> Self {
        error!(error = %value, "repository failure");
        Self::internal(value.to_string())
    }
}
