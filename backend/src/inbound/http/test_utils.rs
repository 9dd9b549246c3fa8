//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{NewAccount, UsersCommand};
use crate::domain::{Email, Identity, Password, Role, User, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::error::configure_extractors;
use crate::inbound::http::state::HttpState;
use crate::outbound::Repositories;
use crate::server::{ServiceDeps, build_account_service, build_http_state};

/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "segredo1";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory services plus the means to seed accounts.
pub struct TestBackend {
    repos: Repositories,
    deps: ServiceDeps,
    pub state: HttpState,
}

impl TestBackend {
    pub fn new() -> Self {
        let repos = Repositories::in_memory();
        let deps = ServiceDeps::default();
        let state = build_http_state(&repos, &deps);
        Self { repos, deps, state }
    }

    /// Create an account with `role` and the shared test password.
    pub async fn seed(&self, email: &str, role: Role) -> User {
        let account = NewAccount {
            email: Email::new(email).expect("email"),
            password: Password::new(TEST_PASSWORD).expect("password"),
            name: None,
            national_id: None,
            role: Some(role),
        };
        let accounts = build_account_service(&self.repos, &self.deps);
        let created = if role == Role::Admin {
            accounts.bootstrap_admin(account).await
        } else {
            let operator = Identity::new(UserId::random(), Role::Admin);
            accounts.sign_up(Some(operator), account).await
        };
        created.expect("seed account")
    }

    /// The `/api` scope over this backend, behind a test session cookie.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new().app_data(web::Data::new(self.state.clone())).service(
            web::scope("/api")
                .wrap(test_session_middleware())
                .configure(configure_extractors)
                .configure(configure_api),
        )
    }
}

/// Extract the session cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
