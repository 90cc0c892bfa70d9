//! TCP listener and per-connection HTTP serving.
//!
//! Each accepted connection is served on its own task with HTTP/1.1
//! keep-alive. An idle connection is closed once no new request header
//! arrives within the idle timeout.

use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::{extract::ConnectInfo, Router};
use hyper::{body::Incoming, server::conn::http1, Request};
use hyper_util::{
    rt::{TokioIo, TokioTimer},
    server::graceful::GracefulShutdown,
    service::TowerToHyperService,
};
use scriptgate_executor::{PathResolver, ScriptRunner};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::info;

use crate::{
    config::GatewayConfig,
    error::StartupError,
    routes::{create_router, AppState},
    tokens::{FileTokenSource, TokenStore},
};

/// How long in-flight connections get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(45);

/// Bind the listening socket on all interfaces.
///
/// # Errors
/// Returns [`StartupError::PortBind`] if the port is already in use.
pub async fn bind(port: u16) -> Result<TcpListener, StartupError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::PortBind { port, source })
}

/// Assemble the production state: file-backed tokens and the real runner.
#[must_use]
pub fn build_state(config: &GatewayConfig) -> AppState {
    let tokens = Arc::new(TokenStore::new(FileTokenSource::new(&config.token_file)));
    // A missing token file is logged inside `load`; the gateway then starts
    // with an empty set and retries on every request.
    let _ = tokens.load();

    AppState::new(
        tokens,
        PathResolver::new(&config.script_dir),
        Arc::new(ScriptRunner::new()),
        config.exec_timeout,
    )
}

/// Bind, then serve until `shutdown` resolves.
///
/// # Errors
/// Returns [`StartupError::PortBind`] before any traffic is served if the
/// port is unavailable.
pub async fn run(
    config: GatewayConfig,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<(), StartupError> {
    let listener = bind(config.port).await?;

    if config.write_timeout_too_short() {
        tracing::warn!(
            exec_timeout_s = config.exec_timeout.as_secs(),
            write_timeout_s = config.timeouts.write.as_secs(),
            "write timeout does not exceed the script timeout; slow scripts will be cut off early"
        );
    }

    let state = build_state(&config);
    let app = create_router(state, config.timeouts);

    info!(
        port = config.port,
        script_dir = %config.script_dir.display(),
        exec_timeout_s = config.exec_timeout.as_secs(),
        "scriptgate listening"
    );

    serve(listener, app, config.timeouts.idle, shutdown).await;
    Ok(())
}

/// Accept connections until `shutdown` resolves, then drain.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    idle_timeout: Duration,
    shutdown: impl Future<Output = ()> + Send,
) {
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        let (stream, remote) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                    continue;
                }
            },
            () = &mut shutdown => {
                info!("shutdown requested; no longer accepting connections");
                break;
            }
        };

        let service = app.clone().map_request(move |mut request: Request<Incoming>| {
            request.extensions_mut().insert(ConnectInfo(remote));
            request
        });

        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new()).header_read_timeout(idle_timeout).keep_alive(true);
        let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), TowerToHyperService::new(service)));

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(%remote, error = %e, "connection closed with error");
            }
        });
    }

    if tokio::time::timeout(SHUTDOWN_GRACE, graceful.shutdown()).await.is_err() {
        tracing::warn!("in-flight connections did not finish before the grace period");
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
