//! Provision a back-office account directly in the database.
//!
//! The first super-admin has to come from somewhere: no command may create
//! an account without an authorized acting user.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;

use backoffice::domain::ports::UserRepository;
use backoffice::domain::{NewUser, Role};
use backoffice::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use clap::Parser;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const DEFAULT_DATABASE_PATH: &str = "backoffice.sqlite3";

/// `create-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-user",
    about = "Create a back-office account, reading its password from stdin",
    version
)]
struct CliArgs {
    /// Login name of the new account.
    #[arg(long, value_name = "name")]
    name: String,
    /// Role of the new account: super_admin, admin or operator.
    #[arg(long, value_name = "role", default_value = "super_admin")]
    role: Role,
    /// SQLite database file. Falls back to `BACKOFFICE_DATABASE_PATH`.
    #[arg(long = "database", value_name = "path")]
    database: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let password = read_password()?;
    let user = NewUser::try_new(&args.name, args.role, &password)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;

    let database = resolve_database(args.database).display().to_string();
    run_pending_migrations(&database)
        .await
        .map_err(|error| io::Error::other(format!("migrate {database}: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let created = DieselUserRepository::new(pool)
        .create(&user)
        .await
        .map_err(|error| io::Error::other(format!("create user: {error}")))?;

    println!("id={}", created.id);
    println!("name={}", created.name);
    println!("role={}", created.role);
    Ok(())
}

fn resolve_database(cli: Option<PathBuf>) -> PathBuf {
    cli.or_else(|| env::var_os("BACKOFFICE_DATABASE_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
}

fn read_password() -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    if line.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "expected the password on stdin",
        ));
    }
    Ok(line)
}
