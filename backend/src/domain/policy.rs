//! Role policy.
//!
//! Every command and query asks [`Capabilities::for_identity`] what the
//! caller may do and which slice of the data it may see, instead of
//! branching on the role locally.
//!
//! | Role | Sessions | Projects | Votes |
//! |---|---|---|---|
//! | Admin | all | all | all |
//! | Manager | created by them or in communities they created | within those sessions | within those sessions |
//! | Participant | in communities they belong to | within those sessions | their own |

use super::{Identity, Role, UserId};

/// Which sessions (and therefore projects) a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope {
    /// Every session.
    All,
    /// Sessions created by the user or in communities the user created.
    ManagedBy(UserId),
    /// Sessions in communities the user belongs to.
    MemberOf(UserId),
}

/// Which votes a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteScope {
    /// Every vote.
    All,
    /// Votes in sessions managed by the user.
    InSessionsManagedBy(UserId),
    /// Votes cast by the user.
    CastBy(UserId),
}

/// Which communities count as "mine" for a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityScope {
    /// Every community.
    All,
    /// Communities the user is a member of.
    MemberOf(UserId),
}

/// Capability set granted to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The caller the capabilities were derived for.
    pub identity: Identity,
    /// May cast and edit votes.
    pub cast_votes: bool,
    /// May create communities.
    pub create_communities: bool,
    /// May create sessions and projects (subject to ownership checks).
    pub create_sessions: bool,
    /// May create sessions without a community.
    pub create_global_sessions: bool,
    /// May list, edit and delete any account and assign roles.
    pub manage_users: bool,
    /// May read PII reports.
    pub view_reports: bool,
    /// Must have voted in a session before reading its results.
    pub results_require_vote: bool,
    /// Visible sessions and projects.
    pub sessions: SessionScope,
    /// Visible votes.
    pub votes: VoteScope,
    /// Communities listed as the caller's own.
    pub communities: CommunityScope,
}

impl Capabilities {
    /// Derive the capability set for `identity`.
    ///
    /// # Examples
    /// ```
    /// use votecerto::domain::{Capabilities, Identity, Role, SessionScope, UserId};
    ///
    /// let user = UserId::random();
    /// let caps = Capabilities::for_identity(Identity::new(user, Role::Manager));
    /// assert_eq!(caps.sessions, SessionScope::ManagedBy(user));
    /// assert!(!caps.cast_votes);
    /// ```
    #[must_use]
    pub const fn for_identity(identity: Identity) -> Self {
        let user = identity.user_id;
        match identity.role {
            Role::Admin => Self {
                identity,
                cast_votes: false,
                create_communities: true,
                create_sessions: true,
                create_global_sessions: true,
                manage_users: true,
                view_reports: true,
                results_require_vote: false,
                sessions: SessionScope::All,
                votes: VoteScope::All,
                communities: CommunityScope::All,
            },
            Role::Manager => Self {
                identity,
                cast_votes: false,
                create_communities: true,
                create_sessions: true,
                create_global_sessions: false,
                manage_users: false,
                view_reports: true,
                results_require_vote: false,
                sessions: SessionScope::ManagedBy(user),
                votes: VoteScope::InSessionsManagedBy(user),
                communities: CommunityScope::MemberOf(user),
            },
            Role::Participant => Self {
                identity,
                cast_votes: true,
                create_communities: false,
                create_sessions: false,
                create_global_sessions: false,
                manage_users: false,
                view_reports: false,
                results_require_vote: true,
                sessions: SessionScope::MemberOf(user),
                votes: VoteScope::CastBy(user),
                communities: CommunityScope::MemberOf(user),
            },
        }
    }

    /// Whether the caller has unrestricted access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.identity.role, Role::Admin)
    }

    /// Whether the caller created a resource or is an admin.
    #[must_use]
    pub fn owns(&self, creator: &UserId) -> bool {
        self.is_admin() || self.identity.user_id == *creator
    }
}
