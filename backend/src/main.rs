//! Back-office entry-point: migrates the store, wires the command channel
//! and serves it on the loopback interface.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use color_eyre::eyre::{Context, Result};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backoffice::AppContext;
use backoffice::config::BackofficeSettings;
use backoffice::inbound::http::{self, health::HealthState};
use backoffice::outbound::persistence::{DbPool, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BackofficeSettings::load().wrap_err("load settings")?;
    let database = settings.database_path().display().to_string();
    run_pending_migrations(&database)
        .await
        .wrap_err_with(|| format!("migrate {database}"))?;
    let pool = DbPool::new(settings.pool_config())
        .await
        .wrap_err("open connection pool")?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let context = AppContext::new(pool, clock).wrap_err("register commands")?;
    let channel = web::Data::from(context.channel());

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let bind_addr = settings.bind_addr();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(channel.clone())
            .app_data(server_health_state.clone())
            .configure(http::configure)
    })
    .bind(bind_addr)
    .wrap_err_with(|| format!("bind {bind_addr}"))?;

    info!(%bind_addr, %database, "back office listening");
    health_state.mark_ready();
    server.run().await.wrap_err("server failed")
}
