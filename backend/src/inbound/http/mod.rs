//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod communities;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod projects;
pub mod reports;
pub mod response;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;
pub mod votes;

pub use error::ApiResult;

/// Register every `/api` route.
///
/// Literal segments (`minhas`, `ingressar`, `resultados`) are registered
/// ahead of the `{id}` routes that would otherwise capture them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(users::sign_up)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(communities::list_communities)
        .service(communities::create_community)
        .service(communities::my_communities)
        .service(communities::join_community)
        .service(communities::get_community)
        .service(communities::update_community)
        .service(communities::delete_community)
        .service(communities::regenerate_code)
        .service(sessions::list_sessions)
        .service(sessions::create_session)
        .service(sessions::get_session)
        .service(sessions::update_session)
        .service(sessions::delete_session)
        .service(sessions::list_session_projects)
        .service(sessions::list_session_votes)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::get_project)
        .service(projects::update_project)
        .service(projects::delete_project)
        .service(projects::list_project_votes)
        .service(votes::list_votes)
        .service(votes::cast_vote)
        .service(votes::session_results)
        .service(votes::get_vote)
        .service(votes::update_vote)
        .service(votes::retract_vote)
        .service(reports::vote_report)
        .service(dashboard::dashboard_stats);
}
