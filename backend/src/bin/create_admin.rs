//! Create an administrator account directly against the configured store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;

use clap::Parser;
use tokio::runtime::Builder;

use votecerto::domain::ports::NewAccount;
use votecerto::domain::{Email, Password, PersonName};
use votecerto::outbound::Repositories;
use votecerto::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use votecerto::server::{ServiceDeps, build_account_service};

/// `create-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-admin",
    about = "Create a VoteCerto administrator account",
    version
)]
struct CliArgs {
    /// Login email for the new administrator.
    #[arg(long, value_name = "email")]
    email: String,
    /// Initial password (at least six characters).
    #[arg(long, value_name = "password")]
    password: String,
    /// Display name.
    #[arg(long, value_name = "name")]
    name: Option<String>,
    /// Database connection URL. Falls back to `VOTECERTO_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", env = "VOTECERTO_DATABASE_URL")]
    database_url: String,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

#[expect(clippy::print_stdout, reason = "report the created account to the operator")]
async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let account = NewAccount {
        email: Email::new(&args.email).map_err(io::Error::other)?,
        password: Password::new(&args.password).map_err(io::Error::other)?,
        name: args
            .name
            .as_deref()
            .map(PersonName::new)
            .transpose()
            .map_err(io::Error::other)?,
        national_id: None,
        role: None,
    };

    let url = args.database_url;
    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|error| io::Error::other(format!("migration task: {error}")))?
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&url).with_max_size(1).with_min_idle(None))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let accounts = build_account_service(&Repositories::postgres(&pool), &ServiceDeps::default());
    let admin = accounts
        .bootstrap_admin(account)
        .await
        .map_err(|error| io::Error::other(format!("create administrator: {error}")))?;
    println!("created administrator {} ({})", admin.email, admin.id);
    Ok(())
}
