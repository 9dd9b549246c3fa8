//! Community services: creation, invite codes and membership.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CommunitiesCommand, CommunitiesQuery, CommunityChanges, CommunityRepository, CommunityView,
    InviteCodeSource, NewCommunity, PersistenceError, constraints,
};
use crate::domain::{
    Capabilities, Community, CommunityId, CommunitySummary, Error, Identity, InviteCode,
    Membership,
};

fn map_write_error(err: PersistenceError) -> Error {
    err.into_domain("a community with this name already exists")
}

fn is_code_clash(err: &PersistenceError) -> bool {
    err.violated_constraint() == Some(constraints::COMMUNITY_INVITE_CODE)
}

/// Service implementing the community driving ports.
#[derive(Clone)]
pub struct CommunityService {
    communities: Arc<dyn CommunityRepository>,
    codes: Arc<dyn InviteCodeSource>,
    clock: Arc<dyn Clock>,
}

impl CommunityService {
    /// Create the service.
    pub fn new(
        communities: Arc<dyn CommunityRepository>,
        codes: Arc<dyn InviteCodeSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            communities,
            codes,
            clock,
        }
    }

    /// Draw codes until one is not yet in use.
    ///
    /// The check is advisory: two writers may still pick the same code, so
    /// callers also retry when the insert trips the uniqueness constraint.
    async fn unused_code(&self) -> Result<InviteCode, Error> {
        loop {
            let candidate = self.codes.next_code();
            if !self.communities.code_exists(&candidate).await? {
                return Ok(candidate);
            }
            debug!(code = %candidate, "invite code already taken; drawing another");
        }
    }

    async fn load_owned(&self, caps: &Capabilities, id: &CommunityId) -> Result<Community, Error> {
        let community = self
            .communities
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("community not found"))?;
        if !caps.owns(&community.creator_id) {
            return Err(Error::forbidden(
                "only the community creator or an administrator can do this",
            ));
        }
        Ok(community)
    }

    async fn view_of(&self, caps: &Capabilities, community: Community) -> Result<CommunityView, Error> {
        let summary = self
            .communities
            .summary(&community.id)
            .await?
            .ok_or_else(|| Error::not_found("community not found"))?;
        Ok(view(caps, summary))
    }
}

fn view(caps: &Capabilities, summary: CommunitySummary) -> CommunityView {
    CommunityView {
        invite_code_visible: caps.owns(&summary.community.creator_id),
        member_count: summary.member_count,
        session_count: summary.session_count,
        community: summary.community,
        members: None,
    }
}

#[async_trait]
impl CommunitiesCommand for CommunityService {
    async fn create_community(
        &self,
        caller: Identity,
        community: NewCommunity,
    ) -> Result<CommunityView, Error> {
        let caps = Capabilities::for_identity(caller);
        if !caps.create_communities {
            return Err(Error::forbidden(
                "only managers and administrators can create communities",
            ));
        }

        let now = self.clock.utc();
        let created = loop {
            let candidate = Community {
                id: CommunityId::random(),
                name: community.name.clone(),
                description: community.description.clone(),
                invite_code: self.unused_code().await?,
                creator_id: caller.user_id,
                created_at: now,
            };
            match self.communities.insert(&candidate).await {
                Ok(()) => break candidate,
                Err(err) if is_code_clash(&err) => continue,
                Err(err) => return Err(map_write_error(err)),
            }
        };

        self.communities
            .add_member(&Membership {
                user_id: caller.user_id,
                community_id: created.id,
                joined_at: now,
            })
            .await?;
        info!(community_id = %created.id, creator = %caller.user_id, "community created");
        self.view_of(&caps, created).await
    }

    async fn update_community(
        &self,
        caller: Identity,
        id: CommunityId,
        changes: CommunityChanges,
    ) -> Result<CommunityView, Error> {
        let caps = Capabilities::for_identity(caller);
        let mut community = self.load_owned(&caps, &id).await?;
        if let Some(name) = changes.name {
            community.name = name;
        }
        if let Some(description) = changes.description {
            community.description = Some(description);
        }
        self.communities
            .update(&community)
            .await
            .map_err(map_write_error)?;
        self.view_of(&caps, community).await
    }

    async fn delete_community(&self, caller: Identity, id: CommunityId) -> Result<(), Error> {
        let caps = Capabilities::for_identity(caller);
        self.load_owned(&caps, &id).await?;
        if !self.communities.delete(&id).await? {
            return Err(Error::not_found("community not found"));
        }
        info!(community_id = %id, deleted_by = %caller.user_id, "community deleted");
        Ok(())
    }

    async fn join_community(&self, caller: Identity, code: InviteCode) -> Result<Community, Error> {
        let community = self
            .communities
            .find_by_code(&code)
            .await?
            .ok_or_else(|| Error::not_found("invalid invite code"))?;
        self.communities
            .add_member(&Membership {
                user_id: caller.user_id,
                community_id: community.id,
                joined_at: self.clock.utc(),
            })
            .await
            .map_err(|err| err.into_domain("already a member of this community"))?;
        info!(community_id = %community.id, user_id = %caller.user_id, "community joined");
        Ok(community)
    }

    async fn regenerate_code(&self, caller: Identity, id: CommunityId) -> Result<Community, Error> {
        let caps = Capabilities::for_identity(caller);
        let mut community = self.load_owned(&caps, &id).await?;
        loop {
            community.invite_code = self.unused_code().await?;
            match self.communities.update(&community).await {
                Ok(()) => break,
                Err(err) if is_code_clash(&err) => continue,
                Err(err) => return Err(map_write_error(err)),
            }
        }
        info!(community_id = %id, "invite code regenerated");
        Ok(community)
    }
}

#[async_trait]
impl CommunitiesQuery for CommunityService {
    async fn list_communities(&self, caller: Identity) -> Result<Vec<CommunityView>, Error> {
        let caps = Capabilities::for_identity(caller);
        let summaries = self
            .communities
            .list(crate::domain::CommunityScope::All)
            .await?;
        Ok(summaries.into_iter().map(|s| view(&caps, s)).collect())
    }

    async fn my_communities(&self, caller: Identity) -> Result<Vec<CommunityView>, Error> {
        let caps = Capabilities::for_identity(caller);
        let summaries = self.communities.list(caps.communities).await?;
        Ok(summaries.into_iter().map(|s| view(&caps, s)).collect())
    }

    async fn get_community(
        &self,
        caller: Identity,
        id: CommunityId,
    ) -> Result<CommunityView, Error> {
        let caps = Capabilities::for_identity(caller);
        let summary = self
            .communities
            .summary(&id)
            .await?
            .ok_or_else(|| Error::not_found("community not found"))?;
        let mut detail = view(&caps, summary);
        if detail.invite_code_visible {
            detail.members = Some(self.communities.members(&id).await?);
        }
        Ok(detail)
    }
}

#[cfg(test)]
#[path = "community_service_tests.rs"]
mod tests;
