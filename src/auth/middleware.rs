//! Bearer token middleware for the HTTP transport.
//!
//! Runs the authenticator once per HTTP request. A produced grant is stored
//! in the request extensions, where the tool layer picks it up.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::TokenAuthenticator;

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Rejections produced by [`require_bearer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token")]
    InvalidToken,
}

#[derive(Debug, Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_description: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorBody {
            error: "invalid_token",
            error_description: self.to_string(),
        };
        (
            StatusCode::UNAUTHORIZED,
            [(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer error=\"invalid_token\""),
            )],
            Json(body),
        )
            .into_response()
    }
}

pub async fn require_bearer(
    State(authenticator): State<Arc<TokenAuthenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let grant = match token {
        None => Err(AuthError::MissingToken),
        Some(token) => authenticator.authenticate(token).ok_or(AuthError::InvalidToken),
    };

    match grant {
        Ok(grant) => {
            tracing::debug!(subject = %grant.subject(), "bearer token accepted");
            req.extensions_mut().insert(grant);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(path = %req.uri().path(), error = %err, "request rejected");
            err.into_response()
        }
    }
}
