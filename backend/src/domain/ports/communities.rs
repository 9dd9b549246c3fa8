//! Driving ports for communities.

use async_trait::async_trait;

use crate::domain::{Community, CommunityId, CommunityName, Error, Identity, InviteCode, Member};

/// Validated community payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    /// Unique name.
    pub name: CommunityName,
    /// Free-form description.
    pub description: Option<String>,
}

/// Validated community changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityChanges {
    /// New name.
    pub name: Option<CommunityName>,
    /// New description.
    pub description: Option<String>,
}

/// A community as seen by a particular caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityView {
    /// The community.
    pub community: Community,
    /// Whether the caller may see the invite code (creator or admin).
    pub invite_code_visible: bool,
    /// Number of members.
    pub member_count: u64,
    /// Number of sessions.
    pub session_count: u64,
    /// Member list, present for the creator and admins on detail reads.
    pub members: Option<Vec<Member>>,
}

/// Domain use-case port for community changes.
#[async_trait]
pub trait CommunitiesCommand: Send + Sync {
    /// Create a community with a fresh invite code; the creator joins it.
    async fn create_community(
        &self,
        caller: Identity,
        community: NewCommunity,
    ) -> Result<CommunityView, Error>;

    /// Rename or re-describe a community (creator or admin).
    async fn update_community(
        &self,
        caller: Identity,
        id: CommunityId,
        changes: CommunityChanges,
    ) -> Result<CommunityView, Error>;

    /// Delete a community and everything scoped to it (creator or admin).
    async fn delete_community(&self, caller: Identity, id: CommunityId) -> Result<(), Error>;

    /// Join the community owning `code`.
    async fn join_community(&self, caller: Identity, code: InviteCode) -> Result<Community, Error>;

    /// Replace the invite code (creator or admin).
    async fn regenerate_code(&self, caller: Identity, id: CommunityId) -> Result<Community, Error>;
}

/// Domain use-case port for reading communities.
#[async_trait]
pub trait CommunitiesQuery: Send + Sync {
    /// All communities, codes redacted where the caller may not see them.
    async fn list_communities(&self, caller: Identity) -> Result<Vec<CommunityView>, Error>;

    /// Communities the caller belongs to (all of them for admins).
    async fn my_communities(&self, caller: Identity) -> Result<Vec<CommunityView>, Error>;

    /// One community with members for its creator and admins.
    async fn get_community(&self, caller: Identity, id: CommunityId)
    -> Result<CommunityView, Error>;
}
