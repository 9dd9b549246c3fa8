//! Port supplying candidate invite codes.

use crate::domain::InviteCode;

/// Source of random invite code candidates. Uniqueness is checked by the
/// caller against the store.
#[cfg_attr(test, mockall::automock)]
pub trait InviteCodeSource: Send + Sync {
    /// Draw a fresh candidate.
    fn next_code(&self) -> InviteCode;
}
