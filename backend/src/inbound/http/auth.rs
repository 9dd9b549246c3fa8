//! Login, logout and current-account handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"ana@example.com","senha":"segredo1"}
//! DELETE /api/auth/logout
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, Identity, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.senha)
    }
}

/// Verify credentials and establish the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = Envelope<UserResponse>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_identity(Identity::new(user.id, user.role))?;
    Ok(response::ok_with_message(
        UserResponse::from(user),
        "Login realizado com sucesso",
    ))
}

/// Drop the session cookie.
#[utoipa::path(
    delete,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[delete("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(identity)) = session.identity() {
        info!(user_id = %identity.user_id, "logout");
    }
    session.purge();
    response::message("Logout realizado com sucesso")
}

/// The account behind the session cookie.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = Envelope<UserResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let user = state.users.current_user(caller).await?;
    Ok(response::ok(UserResponse::from(user)))
}
