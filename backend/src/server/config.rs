//! HTTP server configuration: layered settings and the assembled server
//! configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::session_config::SessionSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings loaded from `VOTECERTO_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VOTECERTO")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Lifetime of the session cookie in hours.
    pub session_ttl_hours: Option<i64>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl ServerSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::other(format!("invalid VOTECERTO_BIND_ADDR '{raw}': {err}"))
        })
    }

    /// Session lifetime, falling back to seven days.
    #[must_use]
    pub fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours
            .filter(|hours| *hours > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
    }

    /// Pool size, falling back to ten connections.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl_hours: i64,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Combine cookie settings with the listener address.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            bind_addr,
        }
    }

    /// Override the session cookie lifetime.
    #[must_use]
    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("votecerto")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("VOTECERTO_BIND_ADDR", None::<String>),
            ("VOTECERTO_DATABASE_URL", None::<String>),
            ("VOTECERTO_SESSION_TTL_HOURS", None::<String>),
            ("VOTECERTO_POOL_MAX_SIZE", None::<String>),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.session_ttl_hours(), 168);
        assert_eq!(settings.pool_max_size(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("VOTECERTO_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "VOTECERTO_DATABASE_URL",
                Some("postgres://localhost/votecerto".to_owned()),
            ),
            ("VOTECERTO_SESSION_TTL_HOURS", Some("12".to_owned())),
            ("VOTECERTO_POOL_MAX_SIZE", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/votecerto")
        );
        assert_eq!(settings.session_ttl_hours(), 12);
        assert_eq!(settings.pool_max_size(), 4);
    }

    #[rstest]
    fn garbage_bind_address_is_an_error() {
        let settings = ServerSettings {
            bind_addr: Some("not-an-address".to_owned()),
            database_url: None,
            session_ttl_hours: None,
            pool_max_size: None,
        };

        let err = settings.bind_addr().expect_err("invalid");

        assert!(err.to_string().contains("not-an-address"));
    }
}
