//! Bearer-token authentication middleware.
//!
//! `Unauthenticated → TokenPresent? → TokenValid? → Authorized`. The decoy
//! paths are routed before this layer and never reach it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{access_log::remote_addr, error::GatewayError, routes::AppState, tokens::TokenStore};

/// Reject the request with 401 unless it carries a known bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_owned);
    let checked = match token {
        Ok(token) => {
            if is_authorized(&state.tokens, token).await {
                Ok(())
            } else {
                Err(GatewayError::AuthInvalid)
            }
        }
        Err(e) => Err(e),
    };

    match checked {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(
                remote = %remote_addr(&request),
                path = %request.uri().path(),
                reason = %e,
                "unauthorized access attempt"
            );
            e.into_response()
        }
    }
}

/// Check `token`, reloading the store on a miss.
///
/// Hits are answered inline. A miss reads the token file, so the
/// reload-and-retry runs on the blocking pool.
pub async fn is_authorized(tokens: &Arc<TokenStore>, token: String) -> bool {
    if tokens.contains(&token) {
        return true;
    }
    let tokens = Arc::clone(tokens);
    match tokio::task::spawn_blocking(move || tokens.authorize(&token)).await {
        Ok(authorized) => authorized,
        Err(e) => {
            tracing::error!(error = %e, "token reload task failed");
            false
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header must be exactly two space-separated parts.
///
/// # Errors
/// [`GatewayError::AuthMissing`] if the header is absent or empty,
/// [`GatewayError::AuthMalformed`] for any other shape.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, GatewayError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(GatewayError::AuthMissing);
    };
    if value.is_empty() {
        return Err(GatewayError::AuthMissing);
    }
    let value = value.to_str().map_err(|_| GatewayError::AuthMalformed)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(GatewayError::AuthMalformed),
    }
}
