//! Domain primitives, policy and services.
//!
//! Purpose: define strongly typed entities for accounts, communities,
//! voting sessions, projects and votes; the role policy deciding what each
//! caller may do and see; and the services implementing the driving ports
//! on top of the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a stable code.
//! - Capabilities: per-role flags and visibility scopes.
//! - `*Service`: use-case implementations wired by the server.
//! - Pure helpers: [`aggregate_results`], [`build_vote_report`],
//!   [`mask_national_id`], [`build_dashboard`].

pub mod account_service;
pub mod auth;
pub mod community;
pub mod community_service;
pub mod dashboard;
pub mod error;
pub mod ids;
pub mod insight_service;
pub mod policy;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod report;
pub mod results;
pub(crate) mod session_access;
pub mod session_service;
#[cfg(test)]
pub(crate) mod test_fixtures;
pub mod trace_id;
pub mod user;
pub mod vote;
pub mod vote_service;
pub mod voting_session;

pub use self::account_service::AccountService;
pub use self::auth::{
    Identity, LoginCredentials, LoginValidationError, PASSWORD_MIN, Password,
};
pub use self::community::{
    COMMUNITY_NAME_MAX, COMMUNITY_NAME_MIN, Community, CommunityName, CommunitySummary,
    CommunityValidationError, INVITE_CODE_MIN, InviteCode, Member, Membership,
};
pub use self::community_service::CommunityService;
pub use self::dashboard::{DashboardStats, ProjectStats, SessionStats, build_dashboard};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CommunityId, IdParseError, ProjectId, SessionId, UserId, VoteId};
pub use self::insight_service::InsightService;
pub use self::policy::{Capabilities, CommunityScope, SessionScope, VoteScope};
pub use self::project::Project;
pub use self::project_service::ProjectService;
pub use self::report::{
    ANONYMOUS, ProjectReport, ReportedVote, SessionReport, build_vote_report, mask_national_id,
};
pub use self::results::{ProjectResult, SessionResults, aggregate_results, vote_percentage};
pub use self::session_service::SessionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, NAME_MAX, NationalId, PasswordHash, PersonName, Role, User, UserValidationError,
};
pub use self::vote::{COMMENT_MAX, Vote, VoteValidationError, VoteView, normalise_comment};
pub use self::vote_service::VoteService;
pub use self::voting_session::{
    SessionValidationError, TITLE_MAX, Title, VotingSession, VotingWindow,
};

