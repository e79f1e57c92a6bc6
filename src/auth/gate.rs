// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token authentication gate.
//!
//! Two axum middleware entry points share one decision routine:
//!
//! - [`require_authentication`] admits only access tokens
//! - [`refresh_authentication`] admits only refresh tokens
//!
//! Checks run in a fixed order and the first failure decides the response:
//!
//! ```text
//! logger context? → authorization header? → bearer token? → signature valid?
//!   → type claim? → type matches? → email claim? → expiry claim? → not expired?
//! ```
//!
//! Every decision after the logger check is logged exactly once. On success
//! the caller's [`AuthenticatedUser`] is inserted into the request extensions
//! and the request continues untouched; the gate writes no status of its own.
//!
//! ```rust,ignore
//! let gate = Arc::new(AuthenticationGate::new(client, verifier, inspector));
//!
//! let app = Router::new()
//!     .route("/v1/session", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         gate.clone(),
//!         require_authentication,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use super::capabilities::{ServiceClient, TokenInspector, TokenVerifier};
use super::error::{AuthError, TokenError};
use super::logger::{LoggerContext, RequestLogger};
use super::token::{AuthenticatedUser, TokenType};

const SUCCESS_MESSAGE: &str = "Successfully authenticated user";

/// A failed check: the client-facing error plus the cause to log.
struct Rejection {
    error: AuthError,
    cause: Option<TokenError>,
}

impl Rejection {
    fn new(error: AuthError) -> Self {
        Self { error, cause: None }
    }

    fn caused_by(error: AuthError, cause: TokenError) -> Self {
        Self {
            error,
            cause: Some(cause),
        }
    }
}

/// Stateless authentication gate over the token capabilities.
///
/// Safe to share across concurrent requests; nothing is retained between
/// invocations.
#[derive(Clone)]
pub struct AuthenticationGate {
    service_client: Arc<dyn ServiceClient>,
    verifier: Arc<dyn TokenVerifier>,
    inspector: Arc<dyn TokenInspector>,
}

impl AuthenticationGate {
    pub fn new(
        service_client: Arc<dyn ServiceClient>,
        verifier: Arc<dyn TokenVerifier>,
        inspector: Arc<dyn TokenInspector>,
    ) -> Self {
        Self {
            service_client,
            verifier,
            inspector,
        }
    }

    /// Identity service client the gate was built with.
    pub fn service_client(&self) -> &Arc<dyn ServiceClient> {
        &self.service_client
    }

    /// Decide whether a request carrying `headers` may proceed as `expected`.
    ///
    /// `now` is the single instant the expiry is compared against. Logs one
    /// error line per rejection, or one info line on success.
    pub async fn authenticate_at(
        &self,
        headers: &HeaderMap,
        logger: &dyn RequestLogger,
        expected: &TokenType,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AuthError> {
        match self.check(headers, expected, now).await {
            Ok(user) => {
                logger.info(SUCCESS_MESSAGE);
                Ok(user)
            }
            Err(rejection) => {
                let cause = rejection
                    .cause
                    .as_ref()
                    .map(|e| e as &(dyn std::error::Error + 'static));
                logger.error(cause, &rejection.error.to_string());
                Err(rejection.error)
            }
        }
    }

    async fn check(
        &self,
        headers: &HeaderMap,
        expected: &TokenType,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, Rejection> {
        let header = headers
            .get(AUTHORIZATION)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Rejection::new(AuthError::MissingAuthHeader))?;

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| Rejection::new(AuthError::MissingBearerToken))?;

        let verified = self
            .verifier
            .verify(token)
            .await
            .map_err(|e| Rejection::caused_by(AuthError::InvalidToken, e))?;

        let token_type = self
            .inspector
            .token_type(&verified)
            .map_err(|e| Rejection::caused_by(AuthError::UnreadableType, e))?;

        if &token_type != expected {
            return Err(Rejection::new(AuthError::WrongTokenType(expected.clone())));
        }

        let email = self
            .inspector
            .email(&verified)
            .map_err(|e| Rejection::caused_by(AuthError::UnreadableEmail, e))?;

        let expiry = self
            .inspector
            .expiry(&verified)
            .map_err(|e| Rejection::caused_by(AuthError::UnreadableExpiry, e))?;

        if expiry <= now {
            return Err(Rejection::new(AuthError::TokenExpired));
        }

        Ok(AuthenticatedUser { email, token_type })
    }

    /// Run the gate for `expected` and either continue to `next` or respond.
    async fn guard(&self, mut request: Request, next: Next, expected: TokenType) -> Response {
        let Some(logger) = request.extensions().get::<LoggerContext>().cloned() else {
            return AuthError::MissingLoggerContext.into_response();
        };

        let now = Utc::now();
        match self
            .authenticate_at(request.headers(), &*logger, &expected, now)
            .await
        {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => e.into_response(),
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// Exactly one space after the scheme; the token must be non-empty and free
/// of whitespace.
fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Middleware admitting requests that carry a valid access token.
pub async fn require_authentication(
    State(gate): State<Arc<AuthenticationGate>>,
    request: Request,
    next: Next,
) -> Response {
    gate.guard(request, next, TokenType::Access).await
}

/// Middleware admitting requests that carry a valid refresh token.
pub async fn refresh_authentication(
    State(gate): State<Arc<AuthenticationGate>>,
    request: Request,
    next: Next,
) -> Response {
    gate.guard(request, next, TokenType::Refresh).await
}
