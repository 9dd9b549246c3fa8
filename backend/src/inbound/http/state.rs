//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable without any storage behind them.

use std::sync::Arc;

use crate::domain::ports::{
    CommunitiesCommand, CommunitiesQuery, DashboardQuery, LoginService, ProjectsCommand,
    ProjectsQuery, ReportsQuery, SessionsCommand, SessionsQuery, UsersCommand, UsersQuery,
    VotesCommand, VotesQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub communities: Arc<dyn CommunitiesQuery>,
    pub communities_command: Arc<dyn CommunitiesCommand>,
    pub sessions: Arc<dyn SessionsQuery>,
    pub sessions_command: Arc<dyn SessionsCommand>,
    pub projects: Arc<dyn ProjectsQuery>,
    pub projects_command: Arc<dyn ProjectsCommand>,
    pub votes: Arc<dyn VotesQuery>,
    pub votes_command: Arc<dyn VotesCommand>,
    pub reports: Arc<dyn ReportsQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
}
