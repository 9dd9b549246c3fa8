//! Dashboard statistics handler.
//!
//! ```text
//! GET /api/dashboard/estatisticas
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DashboardStats, ProjectId, ProjectStats, SessionId, SessionStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatsResponse {
    pub id: SessionId,
    pub titulo: String,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub ativa: bool,
    pub em_andamento: bool,
    pub total_projetos: usize,
    pub total_votos: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectStatsResponse {
    pub id: ProjectId,
    pub sessao_id: SessionId,
    pub titulo: String,
    pub total_votos: usize,
}

/// Figures scoped to what the caller may see.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Administrators only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usuarios: Option<usize>,
    pub total_sessoes: usize,
    pub sessoes_em_andamento: usize,
    pub total_projetos: usize,
    pub total_votos: usize,
    pub sessoes: Vec<SessionStatsResponse>,
    pub projetos: Vec<ProjectStatsResponse>,
}

impl From<SessionStats> for SessionStatsResponse {
    fn from(stats: SessionStats) -> Self {
        Self {
            id: stats.session.id,
            titulo: stats.session.title.as_str().to_owned(),
            data_inicio: stats.session.window.starts_at(),
            data_fim: stats.session.window.ends_at(),
            ativa: stats.session.active,
            em_andamento: stats.live,
            total_projetos: stats.project_count,
            total_votos: stats.vote_count,
        }
    }
}

impl From<ProjectStats> for ProjectStatsResponse {
    fn from(stats: ProjectStats) -> Self {
        Self {
            id: stats.project.id,
            sessao_id: stats.project.session_id,
            titulo: stats.project.title.as_str().to_owned(),
            total_votos: stats.vote_count,
        }
    }
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_usuarios: stats.user_count,
            total_sessoes: stats.sessions.len(),
            sessoes_em_andamento: stats.live_sessions,
            total_projetos: stats.projects.len(),
            total_votos: stats.total_votes,
            sessoes: stats
                .sessions
                .into_iter()
                .map(SessionStatsResponse::from)
                .collect(),
            projetos: stats
                .projects
                .into_iter()
                .map(ProjectStatsResponse::from)
                .collect(),
        }
    }
}

/// Role-scoped counters for the dashboard.
#[utoipa::path(
    get,
    path = "/api/dashboard/estatisticas",
    responses(
        (status = 200, description = "Dashboard figures", body = Envelope<DashboardResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardStats"
)]
#[get("/dashboard/estatisticas")]
pub async fn dashboard_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let stats = state.dashboard.dashboard(caller).await?;
    Ok(response::ok(DashboardResponse::from(stats)))
}
