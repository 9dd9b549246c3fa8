//! Voting session HTTP handlers.
//!
//! ```text
//! GET /api/sessoes?ativa=true&comunidade_id=...
//! POST /api/sessoes {"titulo":"Orçamento 2026","data_inicio":"2026-03-01T08:00","data_fim":"2026-03-31T18:00"}
//! GET|PUT|DELETE /api/sessoes/{id}
//! GET /api/sessoes/{id}/projetos
//! GET /api/sessoes/{id}/votos
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{NewSession, SessionChanges, SessionFilter, SessionView, VoteFilter};
use crate::domain::{CommunityId, SessionId, Title, UserId, VotingWindow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::projects::ProjectResponse;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldErrors, clearable, non_blank, parse_timestamp, present_or_null,
};
use crate::inbound::http::votes::VoteResponse;

/// Body for `POST /api/sessoes`.
///
/// Timestamps accept RFC 3339 or `YYYY-MM-DDTHH:MM`, read as UTC.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SessionRequest {
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_inicio: String,
    pub data_fim: String,
    /// Defaults to `true`.
    pub ativa: Option<bool>,
    /// Omit for a global session (administrators only).
    pub comunidade_id: Option<CommunityId>,
}

/// Body for `PUT /api/sessoes/{id}`.
///
/// An absent `descricao` keeps it; `null` or blank clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub descricao: Option<Option<String>>,
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    pub ativa: Option<bool>,
}

/// Filters for `GET /api/sessoes`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SessionListQuery {
    pub ativa: Option<bool>,
    pub comunidade_id: Option<CommunityId>,
}

/// A session with its live state at the time of the read.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: SessionId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub ativa: bool,
    pub comunidade_id: Option<CommunityId>,
    pub criador_id: UserId,
    pub data_criacao: DateTime<Utc>,
    /// Active and inside its window right now.
    pub em_andamento: bool,
}

impl From<SessionView> for SessionResponse {
    fn from(view: SessionView) -> Self {
        let SessionView { session, live } = view;
        Self {
            id: session.id,
            titulo: session.title.as_str().to_owned(),
            descricao: session.description,
            data_inicio: session.window.starts_at(),
            data_fim: session.window.ends_at(),
            ativa: session.active,
            comunidade_id: session.community_id,
            criador_id: session.creator_id,
            data_criacao: session.created_at,
            em_andamento: live,
        }
    }
}

fn parse_new_session(payload: SessionRequest) -> ApiResult<NewSession> {
    let mut errors = FieldErrors::default();
    let title = errors.check(Title::new(&payload.titulo));
    let starts_at = errors.check(parse_timestamp("data_inicio", &payload.data_inicio));
    let ends_at = errors.check(parse_timestamp("data_fim", &payload.data_fim));
    let window = match (starts_at, ends_at) {
        (Some(start), Some(end)) => errors.check(VotingWindow::new(start, end)),
        _ => None,
    };
    let (title, window) = errors.finish((title, window))?;
    Ok(NewSession {
        title,
        description: non_blank(payload.descricao),
        window,
        active: payload.ativa.unwrap_or(true),
        community_id: payload.comunidade_id,
    })
}

fn parse_changes(payload: UpdateSessionRequest) -> ApiResult<SessionChanges> {
    let mut errors = FieldErrors::default();
    let title = errors.check_opt(payload.titulo.as_deref().map(Title::new));
    let starts_at = errors.check_opt(
        payload
            .data_inicio
            .as_deref()
            .map(|raw| parse_timestamp("data_inicio", raw)),
    );
    let ends_at = errors.check_opt(
        payload
            .data_fim
            .as_deref()
            .map(|raw| parse_timestamp("data_fim", raw)),
    );
    let (title, starts_at, ends_at) = errors.finish((title, starts_at, ends_at))?;
    Ok(SessionChanges {
        title,
        description: clearable(payload.descricao),
        starts_at,
        ends_at,
        active: payload.ativa,
    })
}

/// Visible sessions, most recent start first.
#[utoipa::path(
    get,
    path = "/api/sessoes",
    params(SessionListQuery),
    responses(
        (status = 200, description = "Sessions", body = Envelope<Vec<SessionResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "listSessions"
)]
#[get("/sessoes")]
pub async fn list_sessions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SessionListQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let SessionListQuery {
        ativa,
        comunidade_id,
    } = query.into_inner();
    let filter = SessionFilter {
        active: ativa,
        community_id: comunidade_id,
    };
    let list = state.sessions.list_sessions(caller, filter).await?;
    Ok(response::ok(
        list.into_iter()
            .map(SessionResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Open a voting session.
#[utoipa::path(
    post,
    path = "/api/sessoes",
    request_body = SessionRequest,
    responses(
        (status = 201, description = "Session created", body = Envelope<SessionResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Community not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "createSession"
)]
#[post("/sessoes")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SessionRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let new_session = parse_new_session(payload.into_inner())?;
    let view = state
        .sessions_command
        .create_session(caller, new_session)
        .await?;
    Ok(response::created(
        SessionResponse::from(view),
        "Sessão criada com sucesso",
    ))
}

/// One visible session.
#[utoipa::path(
    get,
    path = "/api/sessoes/{id}",
    params(("id" = SessionId, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session", body = Envelope<SessionResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "getSession"
)]
#[get("/sessoes/{id}")]
pub async fn get_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SessionId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let view = state.sessions.get_session(caller, path.into_inner()).await?;
    Ok(response::ok(SessionResponse::from(view)))
}

/// Change a session (creator or administrator).
#[utoipa::path(
    put,
    path = "/api/sessoes/{id}",
    params(("id" = SessionId, Path, description = "Session identifier")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Updated session", body = Envelope<SessionResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "updateSession"
)]
#[put("/sessoes/{id}")]
pub async fn update_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SessionId>,
    payload: web::Json<UpdateSessionRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let changes = parse_changes(payload.into_inner())?;
    let view = state
        .sessions_command
        .update_session(caller, path.into_inner(), changes)
        .await?;
    Ok(response::ok_with_message(
        SessionResponse::from(view),
        "Sessão atualizada com sucesso",
    ))
}

/// Delete a session with its projects and votes.
#[utoipa::path(
    delete,
    path = "/api/sessoes/{id}",
    params(("id" = SessionId, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "deleteSession"
)]
#[delete("/sessoes/{id}")]
pub async fn delete_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SessionId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    state
        .sessions_command
        .delete_session(caller, path.into_inner())
        .await?;
    Ok(response::message("Sessão excluída com sucesso"))
}

/// Projects of one visible session.
#[utoipa::path(
    get,
    path = "/api/sessoes/{id}/projetos",
    params(("id" = SessionId, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Projects in creation order", body = Envelope<Vec<ProjectResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "listSessionProjects"
)]
#[get("/sessoes/{id}/projetos")]
pub async fn list_session_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SessionId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let id = path.into_inner();
    state.sessions.get_session(caller, id).await?;
    let projects = state.projects.list_projects(caller, Some(id)).await?;
    Ok(response::ok(
        projects
            .into_iter()
            .map(ProjectResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Visible votes of one visible session.
#[utoipa::path(
    get,
    path = "/api/sessoes/{id}/votos",
    params(("id" = SessionId, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Votes, newest first", body = Envelope<Vec<VoteResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["sessions"],
    operation_id = "listSessionVotes"
)]
#[get("/sessoes/{id}/votos")]
pub async fn list_session_votes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SessionId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let id = path.into_inner();
    state.sessions.get_session(caller, id).await?;
    let filter = VoteFilter {
        session_id: Some(id),
        project_id: None,
    };
    let votes = state.votes.list_votes(caller, filter).await?;
    Ok(response::ok(
        votes.into_iter().map(VoteResponse::from).collect::<Vec<_>>(),
    ))
}
