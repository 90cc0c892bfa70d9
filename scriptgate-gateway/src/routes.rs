//! Axum router and handlers for the scriptgate API.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use scriptgate_core::Completion;
use scriptgate_executor::{Executor, PathResolver, ScriptInvocation};
use tower_http::{timeout::RequestBodyTimeoutLayer, trace::TraceLayer};

use crate::{
    access_log::{access_log, remote_addr},
    auth::require_bearer,
    compose::{compose, ComposedResponse},
    config::HttpTimeouts,
    error::GatewayError,
    tokens::TokenStore,
};

/// Largest request body forwarded to a script.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const DECOY_PAGE: &str = include_str!("static/decoy.html");

// ── Shared state ─────────────────────────────────────────────────────────────

/// Dependencies injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenStore>,
    pub resolver: Arc<PathResolver>,
    pub executor: Arc<dyn Executor>,
    pub exec_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(
        tokens: Arc<TokenStore>,
        resolver: PathResolver,
        executor: Arc<dyn Executor>,
        exec_timeout: Duration,
    ) -> Self {
        Self { tokens, resolver: Arc::new(resolver), executor, exec_timeout }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router.
///
/// `/` and `/index.html` are an explicit unauthenticated branch; every other
/// path goes through bearer auth to the script dispatcher.
pub fn create_router(state: AppState, timeouts: HttpTimeouts) -> Router {
    let scripts = Router::new()
        .fallback(run_script)
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);

    Router::new()
        .route("/", any(decoy_page))
        .route("/index.html", any(decoy_page))
        .fallback_service(scripts)
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
        .layer(middleware::from_fn_with_state(timeouts.write, handler_deadline))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(access_log))
}

/// Bound the whole handler by the write timeout.
///
/// Dropping the inner future also kills a script that is still running.
async fn handler_deadline(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis(), "handler exceeded write timeout");
            GatewayError::HandlerTimeout.into_response()
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Decoy page served to anyone probing the root, authenticated or not.
pub async fn decoy_page(request: Request) -> Html<String> {
    let remote = remote_addr(&request);
    tracing::warn!(%remote, path = %request.uri().path(), "suspicious web access");
    Html(DECOY_PAGE.replace("{{REMOTE_ADDR}}", &remote))
}

/// Resolve the path to a script, run it and relay its output.
///
/// # Errors
/// [`GatewayError::PathTraversal`] (403), [`GatewayError::ScriptNotFound`]
/// (404), [`GatewayError::BodyUnreadable`] (400) or
/// [`GatewayError::Executor`] (500) when no outcome can be produced.
pub async fn run_script(
    State(state): State<AppState>,
    request: Request,
) -> Result<ComposedResponse, GatewayError> {
    let remote = remote_addr(&request);
    let method = request.method().as_str().to_owned();
    let raw_path = request.uri().path().to_owned();

    let target = state.resolver.resolve(&raw_path).map_err(|e| {
        tracing::warn!(path = %raw_path, %remote, error = %e, "script resolution rejected");
        GatewayError::from(e)
    })?;

    let body = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| GatewayError::BodyUnreadable(e.to_string()))?;

    let script = target.name().to_owned();
    let invocation = ScriptInvocation::for_request(target, &method, body.to_vec(), state.exec_timeout);

    let outcome = state.executor.run(invocation).await.map_err(|e| {
        tracing::error!(%script, %remote, error = %e, "script could not be executed");
        GatewayError::from(e)
    })?;

    let elapsed_ms = outcome.elapsed.as_millis();
    match outcome.completion {
        Completion::Success => tracing::info!(%script, %remote, elapsed_ms, "script succeeded"),
        Completion::TimedOut => tracing::warn!(%script, %remote, elapsed_ms, "script timed out"),
        other => tracing::warn!(%script, %remote, elapsed_ms, completion = %other, "script failed"),
    }

    Ok(compose(outcome))
}
