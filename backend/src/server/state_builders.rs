//! Builders wiring domain services over a repository bundle into the HTTP
//! state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{InviteCodeSource, PasswordHasher};
use crate::domain::{
    AccountService, CommunityService, InsightService, ProjectService, SessionService, VoteService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::Repositories;
use crate::outbound::security::{Argon2PasswordHasher, RandomInviteCodes};

/// Collaborators every service set needs besides the repositories.
#[derive(Clone)]
pub struct ServiceDeps {
    pub hasher: Arc<dyn PasswordHasher>,
    pub codes: Arc<dyn InviteCodeSource>,
    pub clock: Arc<dyn Clock>,
}

impl Default for ServiceDeps {
    fn default() -> Self {
        Self {
            hasher: Arc::new(Argon2PasswordHasher::new()),
            codes: Arc::new(RandomInviteCodes),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Build the account service on its own, for tooling such as
/// `create-admin` that has no HTTP surface.
pub fn build_account_service(repos: &Repositories, deps: &ServiceDeps) -> AccountService {
    AccountService::new(repos.users.clone(), deps.hasher.clone(), deps.clock.clone())
}

/// Construct every service over `repos` and expose them as driving ports.
///
/// # Examples
/// ```
/// use votecerto::outbound::Repositories;
/// use votecerto::server::{ServiceDeps, build_http_state};
///
/// let state = build_http_state(&Repositories::in_memory(), &ServiceDeps::default());
/// let _votes = state.votes_command.clone();
/// ```
pub fn build_http_state(repos: &Repositories, deps: &ServiceDeps) -> HttpState {
    let accounts = Arc::new(build_account_service(repos, deps));
    let communities = Arc::new(CommunityService::new(
        repos.communities.clone(),
        deps.codes.clone(),
        deps.clock.clone(),
    ));
    let sessions = Arc::new(SessionService::new(
        repos.sessions.clone(),
        repos.communities.clone(),
        deps.clock.clone(),
    ));
    let projects = Arc::new(ProjectService::new(
        repos.projects.clone(),
        repos.sessions.clone(),
        repos.communities.clone(),
        deps.clock.clone(),
    ));
    let votes = Arc::new(VoteService::new(
        repos.votes.clone(),
        repos.sessions.clone(),
        repos.projects.clone(),
        repos.communities.clone(),
        deps.clock.clone(),
    ));
    let insights = Arc::new(InsightService::new(
        repos.users.clone(),
        repos.sessions.clone(),
        repos.projects.clone(),
        repos.votes.clone(),
        deps.clock.clone(),
    ));

    HttpState {
        login: accounts.clone(),
        users: accounts.clone(),
        users_command: accounts,
        communities: communities.clone(),
        communities_command: communities,
        sessions: sessions.clone(),
        sessions_command: sessions,
        projects: projects.clone(),
        projects_command: projects,
        votes: votes.clone(),
        votes_command: votes,
        reports: insights.clone(),
        dashboard: insights,
    }
}
