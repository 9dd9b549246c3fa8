//! VoteCerto backend library modules.
//!
//! - **domain**: accounts, communities, voting sessions, projects, votes
//!   and the services that enforce who may do what
//! - **inbound**: the actix-web REST adapter
//! - **outbound**: PostgreSQL and in-memory stores plus password hashing
//! - **server**: configuration and application assembly

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
