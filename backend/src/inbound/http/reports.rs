//! Vote report handler.
//!
//! ```text
//! GET /api/relatorios/votos?sessao_id=...
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ProjectId, ProjectReport, ReportedVote, SessionId, SessionReport, VoteId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Filters for `GET /api/relatorios/votos`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReportQuery {
    pub sessao_id: Option<SessionId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportedVoteResponse {
    pub voto_id: VoteId,
    /// `Anônimo` when the voter has no name.
    pub participante: String,
    #[schema(example = "123.456.789-**")]
    pub cpf: String,
    pub data_voto: DateTime<Utc>,
    pub comentario: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectReportResponse {
    pub projeto_id: ProjectId,
    pub titulo: String,
    pub total_votos: usize,
    pub votos: Vec<ReportedVoteResponse>,
}

/// Votes per project for one session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionReportResponse {
    pub sessao_id: SessionId,
    pub titulo: String,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub total_votos: usize,
    pub projetos: Vec<ProjectReportResponse>,
}

impl From<ReportedVote> for ReportedVoteResponse {
    fn from(vote: ReportedVote) -> Self {
        Self {
            voto_id: vote.vote_id,
            participante: vote.participant_name,
            cpf: vote.masked_national_id,
            data_voto: vote.cast_at,
            comentario: vote.comment,
        }
    }
}

impl From<ProjectReport> for ProjectReportResponse {
    fn from(project: ProjectReport) -> Self {
        Self {
            projeto_id: project.project_id,
            titulo: project.title,
            total_votos: project.total_votes,
            votos: project
                .votes
                .into_iter()
                .map(ReportedVoteResponse::from)
                .collect(),
        }
    }
}

impl From<SessionReport> for SessionReportResponse {
    fn from(report: SessionReport) -> Self {
        Self {
            sessao_id: report.session_id,
            titulo: report.title,
            data_inicio: report.starts_at,
            data_fim: report.ends_at,
            total_votos: report.total_votes,
            projetos: report
                .projects
                .into_iter()
                .map(ProjectReportResponse::from)
                .collect(),
        }
    }
}

/// Votes per project per visible session, with masked CPFs.
#[utoipa::path(
    get,
    path = "/api/relatorios/votos",
    params(ReportQuery),
    responses(
        (status = 200, description = "Reports, most recent session first", body = Envelope<Vec<SessionReportResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Participants cannot read reports", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "voteReport"
)]
#[get("/relatorios/votos")]
pub async fn vote_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ReportQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let reports = state
        .reports
        .vote_report(caller, query.into_inner().sessao_id)
        .await?;
    Ok(response::ok(
        reports
            .into_iter()
            .map(SessionReportResponse::from)
            .collect::<Vec<_>>(),
    ))
}
