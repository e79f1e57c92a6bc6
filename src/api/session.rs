// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints.

use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;

/// Response for the session endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Subject email from the bearer token
    pub email: String,
    /// Type of the token that authenticated the request
    pub token_type: String,
}

impl From<AuthenticatedUser> for SessionResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            email: user.email,
            token_type: user.token_type.to_string(),
        }
    }
}

/// Identity behind the presented access token.
#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated session", body = SessionResponse),
        (status = 401, description = "Invalid, expired or wrongly typed token"),
        (status = 403, description = "No authorization header"),
    )
)]
pub async fn current_session(Extension(user): Extension<AuthenticatedUser>) -> Json<SessionResponse> {
    Json(user.into())
}

/// Identity behind the presented refresh token.
#[utoipa::path(
    get,
    path = "/v1/session/refresh",
    tag = "Session",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated refresh session", body = SessionResponse),
        (status = 401, description = "Invalid, expired or wrongly typed token"),
        (status = 403, description = "No authorization header"),
    )
)]
pub async fn refresh_session(Extension(user): Extension<AuthenticatedUser>) -> Json<SessionResponse> {
    Json(user.into())
}
