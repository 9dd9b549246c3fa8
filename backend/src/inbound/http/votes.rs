//! Voting HTTP handlers.
//!
//! ```text
//! GET /api/votos?sessao_id=...&projeto_id=...
//! POST /api/votos {"sessao_id":"...","projeto_id":"...","comentario":"Apoio"}
//! GET /api/votos/resultados?sessao_id=...
//! GET|PUT|DELETE /api/votos/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CastVote, VoteChanges, VoteFilter, VoteReceipt};
use crate::domain::{
    Error, NationalId, ProjectId, ProjectResult, SessionId, SessionResults, UserId, VoteId,
    VoteView, mask_national_id, normalise_comment,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::present_or_null;

/// Body for `POST /api/votos`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CastVoteRequest {
    pub sessao_id: SessionId,
    pub projeto_id: ProjectId,
    pub comentario: Option<String>,
}

/// Body for `PUT /api/votos/{id}`.
///
/// An absent `comentario` keeps the remark; `null` or blank clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateVoteRequest {
    pub projeto_id: Option<ProjectId>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable)]
    pub comentario: Option<Option<String>>,
}

/// Filters for `GET /api/votos`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VoteListQuery {
    pub sessao_id: Option<SessionId>,
    pub projeto_id: Option<ProjectId>,
}

/// Query for `GET /api/votos/resultados`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ResultsQuery {
    /// Required.
    pub sessao_id: Option<SessionId>,
}

/// The caller's stored vote with the titles it refers to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteReceiptResponse {
    pub id: VoteId,
    pub usuario_id: UserId,
    pub sessao_id: SessionId,
    pub projeto_id: ProjectId,
    pub comentario: Option<String>,
    pub data_voto: DateTime<Utc>,
    pub projeto_titulo: String,
    pub sessao_titulo: String,
}

impl From<VoteReceipt> for VoteReceiptResponse {
    fn from(receipt: VoteReceipt) -> Self {
        let VoteReceipt {
            vote,
            project_title,
            session_title,
        } = receipt;
        Self {
            id: vote.id,
            usuario_id: vote.user_id,
            sessao_id: vote.session_id,
            projeto_id: vote.project_id,
            comentario: vote.comment,
            data_voto: vote.cast_at,
            projeto_titulo: project_title,
            sessao_titulo: session_title,
        }
    }
}

/// A listed vote; the voter's CPF is always masked.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    pub id: VoteId,
    pub usuario_id: UserId,
    pub sessao_id: SessionId,
    pub projeto_id: ProjectId,
    pub comentario: Option<String>,
    pub data_voto: DateTime<Utc>,
    pub usuario_nome: Option<String>,
    pub usuario_email: String,
    #[schema(example = "123.456.789-**")]
    pub usuario_cpf: String,
    pub projeto_titulo: String,
    pub sessao_titulo: String,
}

impl From<VoteView> for VoteResponse {
    fn from(view: VoteView) -> Self {
        let VoteView {
            vote,
            voter_name,
            voter_email,
            voter_national_id,
            project_title,
            session_title,
        } = view;
        Self {
            id: vote.id,
            usuario_id: vote.user_id,
            sessao_id: vote.session_id,
            projeto_id: vote.project_id,
            comentario: vote.comment,
            data_voto: vote.cast_at,
            usuario_nome: voter_name,
            usuario_email: voter_email,
            usuario_cpf: mask_national_id(voter_national_id.as_ref().map(NationalId::as_str)),
            projeto_titulo: project_title,
            sessao_titulo: session_title,
        }
    }
}

/// One project's share of a session's votes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectResultResponse {
    pub projeto_id: ProjectId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub autor: Option<String>,
    pub votos: u64,
    /// Rounded to one decimal place.
    #[schema(example = 75.0)]
    pub percentual: f64,
}

impl From<ProjectResult> for ProjectResultResponse {
    fn from(result: ProjectResult) -> Self {
        Self {
            projeto_id: result.project_id,
            titulo: result.title,
            descricao: result.description,
            autor: result.author,
            votos: result.votes,
            percentual: result.percentage,
        }
    }
}

/// Per-project tally of a session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResultsResponse {
    pub sessao_id: SessionId,
    pub sessao_titulo: String,
    pub total_votos: u64,
    pub resultados: Vec<ProjectResultResponse>,
}

impl From<SessionResults> for ResultsResponse {
    fn from(results: SessionResults) -> Self {
        Self {
            sessao_id: results.session_id,
            sessao_titulo: results.session_title,
            total_votos: results.total_votes,
            resultados: results
                .projects
                .into_iter()
                .map(ProjectResultResponse::from)
                .collect(),
        }
    }
}

fn comment(raw: Option<&str>) -> ApiResult<Option<String>> {
    normalise_comment(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// Visible votes, newest first.
#[utoipa::path(
    get,
    path = "/api/votos",
    params(VoteListQuery),
    responses(
        (status = 200, description = "Votes", body = Envelope<Vec<VoteResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "listVotes"
)]
#[get("/votos")]
pub async fn list_votes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<VoteListQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let VoteListQuery {
        sessao_id,
        projeto_id,
    } = query.into_inner();
    let filter = VoteFilter {
        session_id: sessao_id,
        project_id: projeto_id,
    };
    let votes = state.votes.list_votes(caller, filter).await?;
    Ok(response::ok(
        votes.into_iter().map(VoteResponse::from).collect::<Vec<_>>(),
    ))
}

/// Cast the caller's single vote in a live session.
#[utoipa::path(
    post,
    path = "/api/votos",
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = Envelope<VoteReceiptResponse>),
        (status = 400, description = "Session not active or invalid comment", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Not a participant or not a member", body = ErrorBody),
        (status = 404, description = "Session or project not found", body = ErrorBody),
        (status = 409, description = "Already voted in this session", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "castVote"
)]
#[post("/votos")]
pub async fn cast_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CastVoteRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let CastVoteRequest {
        sessao_id,
        projeto_id,
        comentario,
    } = payload.into_inner();
    let vote = CastVote {
        session_id: sessao_id,
        project_id: projeto_id,
        comment: comment(comentario.as_deref())?,
    };
    let receipt = state.votes_command.cast_vote(caller, vote).await?;
    Ok(response::created(
        VoteReceiptResponse::from(receipt),
        "Voto registrado com sucesso",
    ))
}

/// Per-project results of one session.
#[utoipa::path(
    get,
    path = "/api/votos/resultados",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Results, most voted first", body = Envelope<ResultsResponse>),
        (status = 400, description = "Missing sessao_id", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Participant has not voted or cannot see the session", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "sessionResults"
)]
#[get("/votos/resultados")]
pub async fn session_results(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ResultsQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let session_id = query
        .into_inner()
        .sessao_id
        .ok_or_else(|| Error::invalid_request("sessao_id is required"))?;
    let results = state.votes.session_results(caller, session_id).await?;
    Ok(response::ok(ResultsResponse::from(results)))
}

/// One visible vote.
#[utoipa::path(
    get,
    path = "/api/votos/{id}",
    params(("id" = VoteId, Path, description = "Vote identifier")),
    responses(
        (status = 200, description = "Vote", body = Envelope<VoteResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "getVote"
)]
#[get("/votos/{id}")]
pub async fn get_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<VoteId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let view = state.votes.get_vote(caller, path.into_inner()).await?;
    Ok(response::ok(VoteResponse::from(view)))
}

/// Change the caller's own vote while its session is live.
#[utoipa::path(
    put,
    path = "/api/votos/{id}",
    params(("id" = VoteId, Path, description = "Vote identifier")),
    request_body = UpdateVoteRequest,
    responses(
        (status = 200, description = "Updated vote", body = Envelope<VoteReceiptResponse>),
        (status = 400, description = "Session not active or invalid comment", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Not the voter", body = ErrorBody),
        (status = 404, description = "Vote or project not found", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "updateVote"
)]
#[put("/votos/{id}")]
pub async fn update_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<VoteId>,
    payload: web::Json<UpdateVoteRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let UpdateVoteRequest {
        projeto_id,
        comentario,
    } = payload.into_inner();
    let changes = VoteChanges {
        project_id: projeto_id,
        comment: comentario
            .map(|raw| comment(raw.as_deref()))
            .transpose()?,
    };
    let receipt = state
        .votes_command
        .update_vote(caller, path.into_inner(), changes)
        .await?;
    Ok(response::ok_with_message(
        VoteReceiptResponse::from(receipt),
        "Voto atualizado com sucesso",
    ))
}

/// Withdraw a vote: its owner while the session is live, or an administrator.
#[utoipa::path(
    delete,
    path = "/api/votos/{id}",
    params(("id" = VoteId, Path, description = "Vote identifier")),
    responses(
        (status = 200, description = "Vote withdrawn"),
        (status = 400, description = "Session not active", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["votes"],
    operation_id = "retractVote"
)]
#[delete("/votos/{id}")]
pub async fn retract_vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<VoteId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    state
        .votes_command
        .retract_vote(caller, path.into_inner())
        .await?;
    Ok(response::message("Voto excluído com sucesso"))
}
