//! Project HTTP handlers.
//!
//! ```text
//! GET /api/projetos?sessao_id=...
//! POST /api/projetos {"sessao_id":"...","titulo":"Ciclovia","autor":"Associação do bairro"}
//! GET|PUT|DELETE /api/projetos/{id}
//! GET /api/projetos/{id}/votos
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{NewProject, ProjectChanges, VoteFilter};
use crate::domain::{Error, Project, ProjectId, SessionId, Title};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{clearable, non_blank, present_or_null};
use crate::inbound::http::votes::VoteResponse;

/// Body for `POST /api/projetos`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProjectRequest {
    pub sessao_id: SessionId,
    pub titulo: String,
    pub descricao: Option<String>,
    /// Person or group proposing the project.
    pub autor: Option<String>,
}

/// Body for `PUT /api/projetos/{id}`.
///
/// Absent optional fields are kept; `null` or blank clears them.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProjectRequest {
    pub titulo: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub descricao: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub autor: Option<Option<String>>,
}

/// Filters for `GET /api/projetos`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProjectListQuery {
    pub sessao_id: Option<SessionId>,
}

/// A project as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub sessao_id: SessionId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub autor: Option<String>,
    pub data_criacao: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            sessao_id: project.session_id,
            titulo: project.title.as_str().to_owned(),
            descricao: project.description,
            autor: project.author,
            data_criacao: project.created_at,
        }
    }
}

fn title(raw: &str) -> ApiResult<Title> {
    Title::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Visible projects, optionally of one session.
#[utoipa::path(
    get,
    path = "/api/projetos",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects in creation order", body = Envelope<Vec<ProjectResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projetos")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ProjectListQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let projects = state
        .projects
        .list_projects(caller, query.into_inner().sessao_id)
        .await?;
    Ok(response::ok(
        projects
            .into_iter()
            .map(ProjectResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// Add a project to a session the caller manages.
#[utoipa::path(
    post,
    path = "/api/projetos",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Envelope<ProjectResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody),
        (status = 409, description = "Title already used in the session", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projetos")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let ProjectRequest {
        sessao_id,
        titulo,
        descricao,
        autor,
    } = payload.into_inner();
    let project = NewProject {
        session_id: sessao_id,
        title: title(&titulo)?,
        description: non_blank(descricao),
        author: non_blank(autor),
    };
    let created = state
        .projects_command
        .create_project(caller, project)
        .await?;
    Ok(response::created(
        ProjectResponse::from(created),
        "Projeto criado com sucesso",
    ))
}

/// One visible project.
#[utoipa::path(
    get,
    path = "/api/projetos/{id}",
    params(("id" = ProjectId, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = Envelope<ProjectResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projetos/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let project = state.projects.get_project(caller, path.into_inner()).await?;
    Ok(response::ok(ProjectResponse::from(project)))
}

/// Change a project in a session the caller manages.
#[utoipa::path(
    put,
    path = "/api/projetos/{id}",
    params(("id" = ProjectId, Path, description = "Project identifier")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = Envelope<ProjectResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Title already used in the session", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "updateProject"
)]
#[put("/projetos/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
    payload: web::Json<UpdateProjectRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let UpdateProjectRequest {
        titulo,
        descricao,
        autor,
    } = payload.into_inner();
    let changes = ProjectChanges {
        title: titulo.as_deref().map(title).transpose()?,
        description: clearable(descricao),
        author: clearable(autor),
    };
    let project = state
        .projects_command
        .update_project(caller, path.into_inner(), changes)
        .await?;
    Ok(response::ok_with_message(
        ProjectResponse::from(project),
        "Projeto atualizado com sucesso",
    ))
}

/// Delete a project and its votes.
#[utoipa::path(
    delete,
    path = "/api/projetos/{id}",
    params(("id" = ProjectId, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projetos/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    state
        .projects_command
        .delete_project(caller, path.into_inner())
        .await?;
    Ok(response::message("Projeto excluído com sucesso"))
}

/// Visible votes for one visible project.
#[utoipa::path(
    get,
    path = "/api/projetos/{id}/votos",
    params(("id" = ProjectId, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Votes, newest first", body = Envelope<Vec<VoteResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["projects"],
    operation_id = "listProjectVotes"
)]
#[get("/projetos/{id}/votos")]
pub async fn list_project_votes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ProjectId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let project = state.projects.get_project(caller, path.into_inner()).await?;
    let filter = VoteFilter {
        session_id: Some(project.session_id),
        project_id: Some(project.id),
    };
    let votes = state.votes.list_votes(caller, filter).await?;
    Ok(response::ok(
        votes.into_iter().map(VoteResponse::from).collect::<Vec<_>>(),
    ))
}
