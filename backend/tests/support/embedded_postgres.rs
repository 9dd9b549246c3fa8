//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own temporary database on a cluster shared by the
//! whole test binary, migrated with the same embedded migrations the server
//! runs at start-up.
//!
//! Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start; the suites then
//! print a skip marker instead of failing.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

use votecerto::outbound::Repositories;
use votecerto::outbound::persistence::{DbPool, PoolConfig, run_migrations};

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when the cluster is optional here, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt < CLUSTER_RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{CLUSTER_RETRIES} failed: {err:?}");
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("{err:?}")),
        }
    }
}

/// Repositories over a freshly migrated database.
pub struct PgContext {
    /// Runtime driving every repository call of one test.
    pub runtime: Runtime,
    pub repos: Repositories,
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl PgContext {
    fn setup() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster()?;
        let database = cluster
            .temporary_database(format!("test_{}", uuid::Uuid::new_v4().simple()))
            .map_err(|err| format!("create database: {err:?}"))?;
        let database_url = database.url().to_string();
        run_migrations(&database_url).map_err(|err| err.to_string())?;

        let config = PoolConfig::new(&database_url)
            .with_max_size(4)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;

        Ok(Self {
            runtime,
            repos: Repositories::postgres(&pool),
            database_url,
            _database: database,
        })
    }

    /// Run one async block against the repositories.
    pub fn run<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// A migrated database, or `None` when the cluster is skipped.
pub fn pg_context() -> Option<PgContext> {
    match PgContext::setup() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
