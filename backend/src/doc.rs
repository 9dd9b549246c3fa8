//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler plus the health checks. Request
//! and response bodies are collected from the handler annotations; the
//! session cookie is declared as the default security scheme.
//!
//! The document backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ErrorBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "VoteCerto API",
        description = "Community voting sessions: accounts, communities, sessions, projects, votes, results and reports."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::users::sign_up,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::communities::list_communities,
        crate::inbound::http::communities::my_communities,
        crate::inbound::http::communities::create_community,
        crate::inbound::http::communities::join_community,
        crate::inbound::http::communities::get_community,
        crate::inbound::http::communities::update_community,
        crate::inbound::http::communities::delete_community,
        crate::inbound::http::communities::regenerate_code,
        crate::inbound::http::sessions::list_sessions,
        crate::inbound::http::sessions::create_session,
        crate::inbound::http::sessions::get_session,
        crate::inbound::http::sessions::update_session,
        crate::inbound::http::sessions::delete_session,
        crate::inbound::http::sessions::list_session_projects,
        crate::inbound::http::sessions::list_session_votes,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::list_project_votes,
        crate::inbound::http::votes::list_votes,
        crate::inbound::http::votes::cast_vote,
        crate::inbound::http::votes::session_results,
        crate::inbound::http::votes::get_vote,
        crate::inbound::http::votes::update_vote,
        crate::inbound::http::votes::retract_vote,
        crate::inbound::http::reports::vote_report,
        crate::inbound::http::dashboard::dashboard_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorBody)),
    tags(
        (name = "auth", description = "Login, logout and the current account"),
        (name = "users", description = "Account management"),
        (name = "communities", description = "Communities and invite codes"),
        (name = "sessions", description = "Voting sessions"),
        (name = "projects", description = "Projects competing in a session"),
        (name = "votes", description = "Ballots and results"),
        (name = "reports", description = "Vote reports with masked CPFs"),
        (name = "dashboard", description = "Role-scoped statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::RefOr;

    #[rstest]
    #[case("/api/auth/login")]
    #[case("/api/usuarios/{id}")]
    #[case("/api/communities/ingressar")]
    #[case("/api/sessoes/{id}/projetos")]
    #[case("/api/votos")]
    #[case("/api/votos/resultados")]
    #[case("/api/relatorios/votos")]
    #[case("/api/dashboard/estatisticas")]
    #[case("/health/ready")]
    fn document_lists_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn votes_collection_accepts_list_and_cast() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialise document");
        let votes = &doc["paths"]["/api/votos"];
        assert!(votes["get"].is_object());
        assert!(votes["post"].is_object());
    }

    #[rstest]
    fn error_body_schema_has_error_field() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("ErrorBody").expect("ErrorBody schema") {
            RefOr::T(Schema::Object(obj)) => assert!(obj.properties.contains_key("error")),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
