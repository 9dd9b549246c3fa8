//! Full-application harness over the in-memory store.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use votecerto::domain::ports::NewAccount;
use votecerto::domain::{Email, Password};
use votecerto::inbound::http::health::HealthState;
use votecerto::outbound::Repositories;
use votecerto::server::{
    AppDependencies, SESSION_COOKIE, ServiceDeps, build_account_service, build_app,
    build_http_state, session_middleware,
};

pub const PASSWORD: &str = "segredo1";
pub const ADMIN_EMAIL: &str = "admin@votecerto.test";

/// Backing store shared by every request of one test.
pub struct Backend {
    repos: Repositories,
    deps: ServiceDeps,
    key: Key,
}

impl Backend {
    pub fn new() -> Self {
        Self {
            repos: Repositories::in_memory(),
            deps: ServiceDeps::default(),
            key: Key::generate(),
        }
    }

    /// Create the administrator account every scenario starts from.
    pub async fn with_admin(self) -> Self {
        let account = NewAccount {
            email: Email::new(ADMIN_EMAIL).expect("admin email"),
            password: Password::new(PASSWORD).expect("admin password"),
            name: None,
            national_id: None,
            role: None,
        };
        build_account_service(&self.repos, &self.deps)
            .bootstrap_admin(account)
            .await
            .expect("bootstrap admin");
        self
    }

    pub async fn start(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        let deps = AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(build_http_state(&self.repos, &self.deps)),
            session: session_middleware(self.key.clone(), false, SameSite::Lax, 1),
        };
        test::init_service(build_app(deps)).await
    }
}

/// Status and JSON body of one call.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<Cookie<'static>>,
}

impl Reply {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("response carries an id")
            .to_owned()
    }
}

pub async fn send<S>(app: &S, request: TestRequest, cookie: Option<&Cookie<'static>>) -> Reply
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let cookie = response
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

pub async fn login<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "senha": PASSWORD })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login {email}: {}", reply.body);
    reply.cookie.expect("session cookie")
}

/// Register an account; only an administrator cookie may request a role.
pub async fn sign_up<S>(
    app: &S,
    operator: Option<&Cookie<'static>>,
    email: &str,
    tipo: &str,
    cpf: Option<&str>,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        TestRequest::post().uri("/api/usuarios").set_json(json!({
            "email": email,
            "senha": PASSWORD,
            "nome": email.split('@').next(),
            "cpf": cpf,
            "tipo": tipo,
        })),
        operator,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "sign up {email}: {}", reply.body);
    reply.id()
}

/// Create a community and return `(id, invite code)`.
pub async fn create_community<S>(app: &S, owner: &Cookie<'static>, nome: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        TestRequest::post()
            .uri("/api/communities")
            .set_json(json!({ "nome": nome })),
        Some(owner),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "community: {}", reply.body);
    let code = reply.data()["codigo"]
        .as_str()
        .expect("creator sees the invite code")
        .to_owned();
    (reply.id(), code)
}

/// Offsets in hours from now for a session's window.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub starts_in: i64,
    pub ends_in: i64,
    pub active: bool,
}

impl Window {
    pub const LIVE: Self = Self {
        starts_in: -1,
        ends_in: 2,
        active: true,
    };
}

pub async fn create_session<S>(
    app: &S,
    owner: &Cookie<'static>,
    community_id: Option<&str>,
    window: Window,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let now = Utc::now();
    let reply = send(
        app,
        TestRequest::post().uri("/api/sessoes").set_json(json!({
            "titulo": "Orçamento participativo",
            "data_inicio": (now + Duration::hours(window.starts_in)).to_rfc3339(),
            "data_fim": (now + Duration::hours(window.ends_in)).to_rfc3339(),
            "ativa": window.active,
            "comunidade_id": community_id,
        })),
        Some(owner),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "session: {}", reply.body);
    reply.id()
}

pub async fn create_project<S>(
    app: &S,
    owner: &Cookie<'static>,
    session_id: &str,
    titulo: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let reply = send(
        app,
        TestRequest::post()
            .uri("/api/projetos")
            .set_json(json!({ "sessao_id": session_id, "titulo": titulo })),
        Some(owner),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "project: {}", reply.body);
    reply.id()
}

pub fn vote_request(session_id: &str, project_id: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/votos")
        .set_json(json!({ "sessao_id": session_id, "projeto_id": project_id }))
}

pub async fn join<S>(app: &S, member: &Cookie<'static>, code: &str) -> Reply
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        TestRequest::post()
            .uri("/api/communities/ingressar")
            .set_json(json!({ "codigo": code.to_lowercase() })),
        Some(member),
    )
    .await
}
