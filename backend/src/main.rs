//! User service entry-point: loads settings, connects to PostgreSQL, and
//! serves the user endpoints until SIGINT or SIGTERM.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use user_service::config::ServiceSettings;
use user_service::outbound::persistence::{DbPool, DieselUserRepository};
use user_service::server::{ServerConfig, create_server, run_until_shutdown, shutdown_signal};

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

    let settings = ServiceSettings::load_from_args(std::env::args_os())?;
    let pool = DbPool::new(settings.pool_config())
        .await
        .wrap_err("build database pool")?;
    let users = Arc::new(DieselUserRepository::new(pool));

    let server = create_server(ServerConfig::new(settings.bind_addr(), users))?;
    info!(addr = %server.local_addr, "user service started");

    run_until_shutdown(server, shutdown_signal()).await?;
    info!("user service stopped");
    Ok(())
}
