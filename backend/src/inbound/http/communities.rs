//! Community HTTP handlers.
//!
//! ```text
//! GET|POST /api/communities
//! GET /api/communities/minhas
//! POST /api/communities/ingressar {"codigo":"DEADBEEF"}
//! GET|PUT|DELETE /api/communities/{id}
//! POST /api/communities/{id}/regenerar-codigo
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CommunityChanges, CommunityView, NewCommunity};
use crate::domain::{Community, CommunityId, CommunityName, Error, InviteCode, Member, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::non_blank;

/// Body for `POST /api/communities`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommunityRequest {
    pub nome: String,
    pub descricao: Option<String>,
}

/// Body for `PUT /api/communities/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCommunityRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
}

/// Body for `POST /api/communities/ingressar`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct JoinRequest {
    pub codigo: String,
}

/// A community member, shown to the creator and administrators.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub usuario_id: UserId,
    pub nome: Option<String>,
    pub email: String,
    pub data_ingresso: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            usuario_id: member.user_id,
            nome: member.name,
            email: member.email,
            data_ingresso: member.joined_at,
        }
    }
}

/// A community as seen by the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommunityResponse {
    pub id: CommunityId,
    pub nome: String,
    pub descricao: Option<String>,
    /// Present only for the creator and administrators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    pub criador_id: UserId,
    pub data_criacao: DateTime<Utc>,
    pub total_membros: u64,
    pub total_sessoes: u64,
    /// Present on detail reads for the creator and administrators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membros: Option<Vec<MemberResponse>>,
}

impl From<CommunityView> for CommunityResponse {
    fn from(view: CommunityView) -> Self {
        let CommunityView {
            community,
            invite_code_visible,
            member_count,
            session_count,
            members,
        } = view;
        Self {
            id: community.id,
            nome: community.name.as_str().to_owned(),
            descricao: community.description,
            codigo: invite_code_visible.then(|| community.invite_code.as_str().to_owned()),
            criador_id: community.creator_id,
            data_criacao: community.created_at,
            total_membros: member_count,
            total_sessoes: session_count,
            membros: members.map(|list| list.into_iter().map(MemberResponse::from).collect()),
        }
    }
}

/// The community a participant just joined.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinedCommunityResponse {
    pub id: CommunityId,
    pub nome: String,
    pub descricao: Option<String>,
}

/// A freshly issued invite code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InviteCodeResponse {
    pub id: CommunityId,
    pub codigo: String,
}

fn community_name(raw: &str) -> ApiResult<CommunityName> {
    CommunityName::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn views(list: Vec<CommunityView>) -> Vec<CommunityResponse> {
    list.into_iter().map(CommunityResponse::from).collect()
}

/// List every community; codes are redacted unless the caller may see them.
#[utoipa::path(
    get,
    path = "/api/communities",
    responses(
        (status = 200, description = "Communities, newest first", body = Envelope<Vec<CommunityResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "listCommunities"
)]
#[get("/communities")]
pub async fn list_communities(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let list = state.communities.list_communities(caller).await?;
    Ok(response::ok(views(list)))
}

/// Communities the caller belongs to (all of them for administrators).
#[utoipa::path(
    get,
    path = "/api/communities/minhas",
    responses(
        (status = 200, description = "Caller's communities", body = Envelope<Vec<CommunityResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "myCommunities"
)]
#[get("/communities/minhas")]
pub async fn my_communities(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let list = state.communities.my_communities(caller).await?;
    Ok(response::ok(views(list)))
}

/// Create a community with a fresh invite code.
#[utoipa::path(
    post,
    path = "/api/communities",
    request_body = CommunityRequest,
    responses(
        (status = 201, description = "Community created", body = Envelope<CommunityResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Participants cannot create communities", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "createCommunity"
)]
#[post("/communities")]
pub async fn create_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CommunityRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let CommunityRequest { nome, descricao } = payload.into_inner();
    let community = NewCommunity {
        name: community_name(&nome)?,
        description: non_blank(descricao),
    };
    let view = state
        .communities_command
        .create_community(caller, community)
        .await?;
    Ok(response::created(
        CommunityResponse::from(view),
        "Comunidade criada com sucesso",
    ))
}

/// Join the community owning an invite code.
#[utoipa::path(
    post,
    path = "/api/communities/ingressar",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Joined", body = Envelope<JoinedCommunityResponse>),
        (status = 400, description = "Malformed code", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 404, description = "Unknown code", body = ErrorBody),
        (status = 409, description = "Already a member", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "joinCommunity"
)]
#[post("/communities/ingressar")]
pub async fn join_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<JoinRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let code = InviteCode::parse(&payload.codigo)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let Community {
        id,
        name,
        description,
        ..
    } = state
        .communities_command
        .join_community(caller, code)
        .await?;
    let message = format!(
        "Você ingressou na comunidade \"{}\" com sucesso",
        name.as_str()
    );
    Ok(response::ok_with_message(
        JoinedCommunityResponse {
            id,
            nome: name.as_str().to_owned(),
            descricao: description,
        },
        &message,
    ))
}

/// One community; members and code for its creator and administrators.
#[utoipa::path(
    get,
    path = "/api/communities/{id}",
    params(("id" = CommunityId, Path, description = "Community identifier")),
    responses(
        (status = 200, description = "Community", body = Envelope<CommunityResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "getCommunity"
)]
#[get("/communities/{id}")]
pub async fn get_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommunityId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let view = state
        .communities
        .get_community(caller, path.into_inner())
        .await?;
    Ok(response::ok(CommunityResponse::from(view)))
}

/// Rename or re-describe a community (creator or administrator).
#[utoipa::path(
    put,
    path = "/api/communities/{id}",
    params(("id" = CommunityId, Path, description = "Community identifier")),
    request_body = UpdateCommunityRequest,
    responses(
        (status = 200, description = "Updated community", body = Envelope<CommunityResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Name already taken", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "updateCommunity"
)]
#[put("/communities/{id}")]
pub async fn update_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommunityId>,
    payload: web::Json<UpdateCommunityRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let UpdateCommunityRequest { nome, descricao } = payload.into_inner();
    let changes = CommunityChanges {
        name: nome.as_deref().map(community_name).transpose()?,
        description: non_blank(descricao),
    };
    let view = state
        .communities_command
        .update_community(caller, path.into_inner(), changes)
        .await?;
    Ok(response::ok_with_message(
        CommunityResponse::from(view),
        "Comunidade atualizada com sucesso",
    ))
}

/// Delete a community with its sessions, projects and votes.
#[utoipa::path(
    delete,
    path = "/api/communities/{id}",
    params(("id" = CommunityId, Path, description = "Community identifier")),
    responses(
        (status = 200, description = "Community deleted"),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "deleteCommunity"
)]
#[delete("/communities/{id}")]
pub async fn delete_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommunityId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    state
        .communities_command
        .delete_community(caller, path.into_inner())
        .await?;
    Ok(response::message("Comunidade excluída com sucesso"))
}

/// Replace a community's invite code (creator or administrator).
#[utoipa::path(
    post,
    path = "/api/communities/{id}/regenerar-codigo",
    params(("id" = CommunityId, Path, description = "Community identifier")),
    responses(
        (status = 200, description = "New code", body = Envelope<InviteCodeResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["communities"],
    operation_id = "regenerateInviteCode"
)]
#[post("/communities/{id}/regenerar-codigo")]
pub async fn regenerate_code(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<CommunityId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let community = state
        .communities_command
        .regenerate_code(caller, path.into_inner())
        .await?;
    Ok(response::ok_with_message(
        InviteCodeResponse {
            id: community.id,
            codigo: community.invite_code.as_str().to_owned(),
        },
        "Código de convite regenerado com sucesso",
    ))
}
