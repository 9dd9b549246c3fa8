//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are what inbound
//! adapters call; services in [`crate::domain`] implement them. Driven ports
//! (repositories, [`PasswordHasher`], [`InviteCodeSource`]) are what the
//! services call; outbound adapters implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod communities;
mod community_repository;
mod insights;
mod invite_code_source;
mod password_hasher;
mod persistence_error;
mod project_repository;
mod projects;
mod session_repository;
mod sessions;
mod user_repository;
mod vote_repository;
mod votes;

pub use accounts::{AccountChanges, LoginService, NewAccount, UsersCommand, UsersQuery};
pub use communities::{
    CommunitiesCommand, CommunitiesQuery, CommunityChanges, CommunityView, NewCommunity,
};
#[cfg(test)]
pub use community_repository::MockCommunityRepository;
pub use community_repository::CommunityRepository;
pub use insights::{DashboardQuery, ReportsQuery};
#[cfg(test)]
pub use invite_code_source::MockInviteCodeSource;
pub use invite_code_source::InviteCodeSource;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use persistence_error::{PersistenceError, constraints};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{ProjectQuery, ProjectRepository};
pub use projects::{NewProject, ProjectChanges, ProjectsCommand, ProjectsQuery};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{SessionQuery, SessionRepository};
pub use sessions::{
    NewSession, SessionChanges, SessionFilter, SessionView, SessionsCommand, SessionsQuery,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use vote_repository::MockVoteRepository;
pub use vote_repository::{VoteQuery, VoteRepository};
pub use votes::{CastVote, VoteChanges, VoteFilter, VoteReceipt, VotesCommand, VotesQuery};
