//! Port abstraction for communities and memberships.

use async_trait::async_trait;

use super::PersistenceError;
use crate::domain::{
    Community, CommunityId, CommunityScope, CommunitySummary, InviteCode, Member, Membership,
    UserId,
};

/// Persistence port for communities and their members.
///
/// Names, invite codes and (user, community) memberships are unique; a
/// clashing write fails with [`PersistenceError::UniqueViolation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Store a new community.
    async fn insert(&self, community: &Community) -> Result<(), PersistenceError>;

    /// Overwrite name, description and invite code.
    async fn update(&self, community: &Community) -> Result<(), PersistenceError>;

    /// Remove a community with its sessions, projects, votes and
    /// memberships. Returns whether it existed.
    async fn delete(&self, id: &CommunityId) -> Result<bool, PersistenceError>;

    /// Fetch a community by id.
    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, PersistenceError>;

    /// Fetch the community owning an invite code.
    async fn find_by_code(&self, code: &InviteCode)
    -> Result<Option<Community>, PersistenceError>;

    /// Fetch a community with its member and session counts.
    async fn summary(&self, id: &CommunityId)
    -> Result<Option<CommunitySummary>, PersistenceError>;

    /// Whether any community already uses `code`.
    async fn code_exists(&self, code: &InviteCode) -> Result<bool, PersistenceError>;

    /// Communities in `scope` with member and session counts, newest first.
    async fn list(&self, scope: CommunityScope)
    -> Result<Vec<CommunitySummary>, PersistenceError>;

    /// Record a membership.
    async fn add_member(&self, membership: &Membership) -> Result<(), PersistenceError>;

    /// Whether `user` belongs to `community`.
    async fn is_member(
        &self,
        community: &CommunityId,
        user: &UserId,
    ) -> Result<bool, PersistenceError>;

    /// Members of a community, in join order.
    async fn members(&self, community: &CommunityId) -> Result<Vec<Member>, PersistenceError>;
}
