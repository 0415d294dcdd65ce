//! Server construction and lifecycle.
//!
//! [`create_server`] binds the listener and wires the user routes behind the
//! tracing middleware. [`run_until_shutdown`] drives it until an external
//! signal arrives, then drains in-flight requests within a bounded wait.

mod config;

pub use config::{SHUTDOWN_TIMEOUT, ServerConfig};

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use thiserror::Error;
use tracing::{error, info};

use crate::Trace;
use crate::inbound::http::{HttpState, configure};

/// Failures that end the server lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// The listener stopped with an I/O error.
    #[error("server terminated unexpectedly: {0}")]
    Listener(#[source] std::io::Error),
    /// The listener stopped without a shutdown request.
    #[error("server stopped without a shutdown request")]
    UnexpectedExit,
    /// In-flight requests did not drain in time.
    #[error("graceful shutdown did not finish within {timeout:?}")]
    ShutdownTimedOut { timeout: Duration },
}

/// A started server together with the address it listens on.
pub struct BoundServer {
    /// Server future; it must be polled to accept connections.
    pub server: Server,
    /// First address the listener bound to.
    pub local_addr: SocketAddr,
    /// Bound applied by [`run_until_shutdown`].
    pub shutdown_timeout: Duration,
}

/// Assemble the application: state, tracing, and the user routes.
pub fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
}

/// Actix's own forced-stop deadline, in whole seconds, always past `bound`
/// so the bounded wait in [`run_until_shutdown`] decides the outcome.
fn worker_grace_secs(bound: Duration) -> u64 {
    let whole = bound.as_secs() + u64::from(bound.subsec_nanos() > 0);
    whole + 1
}

/// Bind the listener described by `config`.
///
/// OS signal handling is disabled; shutdown is driven by
/// [`run_until_shutdown`].
///
/// # Errors
/// Returns [`ServerError::Bind`] when the socket cannot be bound.
pub fn create_server(config: ServerConfig) -> Result<BoundServer, ServerError> {
    let ServerConfig {
        bind_addr,
        users,
        shutdown_timeout,
    } = config;
    let http_state = web::Data::new(HttpState::new(users));

    let bound = HttpServer::new(move || build_app(http_state.clone()))
        .disable_signals()
        .shutdown_timeout(worker_grace_secs(shutdown_timeout))
        .bind(bind_addr)
        .map_err(|source| ServerError::Bind {
            addr: bind_addr,
            source,
        })?;
    let local_addr = bound
        .addrs()
        .first()
        .copied()
        .unwrap_or(bind_addr);
    info!(%local_addr, "http server listening");

    Ok(BoundServer {
        server: bound.run(),
        local_addr,
        shutdown_timeout,
    })
}

/// Report whether `fut` completed before `duration` elapsed.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use user_service::server::with_timeout;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// assert!(with_timeout(async {}, Duration::from_millis(10)).await);
/// # });
/// ```
pub async fn with_timeout<F>(fut: F, duration: Duration) -> bool
where
    F: Future,
{
    tokio::time::timeout(duration, fut).await.is_ok()
}

/// Run `bound` until `shutdown` resolves, then stop gracefully.
///
/// # Errors
/// - [`ServerError::Listener`] or [`ServerError::UnexpectedExit`] when the
///   listener ends before a shutdown request.
/// - [`ServerError::ShutdownTimedOut`] when draining exceeds the bound.
pub async fn run_until_shutdown<S>(bound: BoundServer, shutdown: S) -> Result<(), ServerError>
where
    S: Future<Output = ()>,
{
    let BoundServer {
        server,
        shutdown_timeout,
        ..
    } = bound;
    let handle = server.handle();
    tokio::pin!(server);
    tokio::pin!(shutdown);

    tokio::select! {
        result = &mut server => {
            return match result {
                Ok(()) => Err(ServerError::UnexpectedExit),
                Err(err) => Err(ServerError::Listener(err)),
            };
        }
        () = &mut shutdown => {}
    }

    info!(timeout = ?shutdown_timeout, "shutdown requested, draining connections");
    let drain = async {
        let ((), result) = tokio::join!(handle.stop(true), &mut server);
        if let Err(err) = result {
            error!(error = %err, "listener reported an error while stopping");
        }
    };
    if with_timeout(drain, shutdown_timeout).await {
        info!("server stopped");
        Ok(())
    } else {
        error!(timeout = ?shutdown_timeout, "graceful shutdown timed out");
        Err(ServerError::ShutdownTimedOut {
            timeout: shutdown_timeout,
        })
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!(signal = "SIGINT", "shutdown signal received"),
        () = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
    }
}
