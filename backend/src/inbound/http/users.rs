//! Account HTTP handlers.
//!
//! ```text
//! POST /api/usuarios {"email":"ana@example.com","senha":"segredo1"}
//! GET /api/usuarios
//! GET|PUT|DELETE /api/usuarios/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AccountChanges, NewAccount};
use crate::domain::{Email, NationalId, Password, PersonName, Role, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::response::{self, Envelope};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldErrors, non_blank};

/// Signup body for `POST /api/usuarios`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub senha: String,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    /// Only administrators may request anything but `PARTICIPANTE`.
    pub tipo: Option<Role>,
}

/// Partial update body for `PUT /api/usuarios/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub tipo: Option<Role>,
    pub senha: Option<String>,
    /// Required when users change their own password.
    pub senha_atual: Option<String>,
}

/// Account as returned to clients; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub tipo: Role,
    pub data_criacao: DateTime<Utc>,
    pub ultimo_acesso: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            nome: user.name.map(|name| name.as_str().to_owned()),
            cpf: user.national_id.map(|cpf| cpf.as_str().to_owned()),
            tipo: user.role,
            data_criacao: user.created_at,
            ultimo_acesso: user.last_access,
        }
    }
}

fn parse_signup(payload: SignupRequest) -> ApiResult<NewAccount> {
    let mut errors = FieldErrors::default();
    let email = errors.check(Email::new(&payload.email));
    let password = errors.check(Password::new(&payload.senha));
    let name = errors.check_opt(non_blank(payload.nome).map(PersonName::new));
    let national_id = errors.check_opt(non_blank(payload.cpf).map(NationalId::new));
    let (email, password, name, national_id) =
        errors.finish((email, password, name, national_id))?;
    Ok(NewAccount {
        email,
        password,
        name,
        national_id,
        role: payload.tipo,
    })
}

fn parse_changes(payload: UpdateUserRequest) -> ApiResult<AccountChanges> {
    let mut errors = FieldErrors::default();
    let email = errors.check_opt(payload.email.map(Email::new));
    let name = errors.check_opt(non_blank(payload.nome).map(PersonName::new));
    let national_id = errors.check_opt(non_blank(payload.cpf).map(NationalId::new));
    let new_password = errors.check_opt(payload.senha.as_deref().map(Password::new));
    let current_password = errors.check_opt(
        payload
            .senha_atual
            .as_deref()
            .map(Password::for_verification),
    );
    let (email, name, national_id, new_password, current_password) =
        errors.finish((email, name, national_id, new_password, current_password))?;
    Ok(AccountChanges {
        email,
        name,
        national_id,
        role: payload.tipo,
        new_password,
        current_password,
    })
}

/// Register an account. Public; an authenticated admin may assign roles.
#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 403, description = "Role assignment not allowed", body = ErrorBody),
        (status = 409, description = "Email or CPF already registered", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "signUp",
    security([])
)]
#[post("/usuarios")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let account = parse_signup(payload.into_inner())?;
    let caller = session.identity()?;
    let user = state.users_command.sign_up(caller, account).await?;
    Ok(response::created(
        UserResponse::from(user),
        "Usuário criado com sucesso",
    ))
}

/// List every account (administrators only).
#[utoipa::path(
    get,
    path = "/api/usuarios",
    responses(
        (status = 200, description = "Accounts, oldest first", body = Envelope<Vec<UserResponse>>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/usuarios")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let users = state.users.list_users(caller).await?;
    Ok(response::ok(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Fetch one account (self or administrator).
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(("id" = UserId, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = Envelope<UserResponse>),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/usuarios/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let user = state.users.get_user(caller, path.into_inner()).await?;
    Ok(response::ok(UserResponse::from(user)))
}

/// Change an account (self or administrator).
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(("id" = UserId, Path, description = "Account identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = Envelope<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Email or CPF already registered", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/usuarios/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    let changes = parse_changes(payload.into_inner())?;
    let user = state
        .users_command
        .update_user(caller, path.into_inner(), changes)
        .await?;
    Ok(response::ok_with_message(
        UserResponse::from(user),
        "Usuário atualizado com sucesso",
    ))
}

/// Delete an account (administrators only, never themselves).
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    params(("id" = UserId, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Administrators cannot delete themselves", body = ErrorBody),
        (status = 401, description = "Unauthorised", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/usuarios/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_identity()?;
    state
        .users_command
        .delete_user(caller, path.into_inner())
        .await?;
    Ok(response::message("Usuário excluído com sucesso"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn signup(email: &str, senha: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_owned(),
            senha: senha.to_owned(),
            nome: None,
            cpf: None,
            tipo: None,
        }
    }

    #[rstest]
    fn signup_reports_every_invalid_field() {
        let err = parse_signup(signup("not-an-email", "123")).expect_err("invalid");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains(", "), "{}", err.message());
    }

    #[rstest]
    fn blank_optional_fields_are_dropped() {
        let mut payload = signup("ana@example.com", "segredo1");
        payload.nome = Some("   ".to_owned());
        payload.cpf = Some(String::new());

        let account = parse_signup(payload).expect("valid");

        assert!(account.name.is_none());
        assert!(account.national_id.is_none());
        assert!(account.role.is_none());
    }

    #[rstest]
    fn current_password_skips_length_rule() {
        let changes = parse_changes(UpdateUserRequest {
            senha: Some("novasenha".to_owned()),
            senha_atual: Some("abc".to_owned()),
            ..UpdateUserRequest::default()
        })
        .expect("valid");

        assert_eq!(
            changes.current_password.as_ref().map(Password::expose),
            Some("abc")
        );
    }

    #[rstest]
    fn short_new_password_is_rejected() {
        let err = parse_changes(UpdateUserRequest {
            senha: Some("abc".to_owned()),
            ..UpdateUserRequest::default()
        })
        .expect_err("too short");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
