// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::public_key::PublicKeyError;
use super::token::TokenType;

/// Reason a request was refused by the authentication gate.
///
/// `Display` yields the fixed message that is logged for the rejection. The
/// underlying cause, when there is one, is logged alongside it and never
/// reaches the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Request-scoped logger was never attached (wiring defect)
    MissingLoggerContext,
    /// No authorization header present, or it was empty
    MissingAuthHeader,
    /// Header present but not of the form `Bearer <token>`
    MissingBearerToken,
    /// Signature or standard claim verification failed
    InvalidToken,
    /// Type claim could not be read
    UnreadableType,
    /// Type claim did not match the gate
    WrongTokenType(TokenType),
    /// Email claim could not be read
    UnreadableEmail,
    /// Expiry claim could not be read
    UnreadableExpiry,
    /// Expiry is not after the time of check
    TokenExpired,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingLoggerContext => "internal_error",
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::MissingBearerToken => "missing_bearer_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UnreadableType => "unreadable_type_claim",
            AuthError::WrongTokenType(_) => "wrong_token_type",
            AuthError::UnreadableEmail => "unreadable_email_claim",
            AuthError::UnreadableExpiry => "unreadable_expiry_claim",
            AuthError::TokenExpired => "token_expired",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingLoggerContext => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::MissingAuthHeader => StatusCode::FORBIDDEN,
            AuthError::MissingBearerToken
            | AuthError::InvalidToken
            | AuthError::UnreadableType
            | AuthError::WrongTokenType(_)
            | AuthError::UnreadableEmail
            | AuthError::UnreadableExpiry
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingLoggerContext => write!(f, "Internal server error"),
            AuthError::MissingAuthHeader => {
                write!(f, "No authorization header was present in the request")
            }
            AuthError::MissingBearerToken => {
                write!(f, "No bearer token was present in the authorization header")
            }
            AuthError::InvalidToken => write!(f, "The bearer token was invalid"),
            AuthError::UnreadableType => write!(f, "Could not obtain type from bearer token"),
            AuthError::WrongTokenType(expected) => {
                write!(f, "The bearer token was not an {expected}")
            }
            AuthError::UnreadableEmail => write!(f, "Could not obtain email from bearer token"),
            AuthError::UnreadableExpiry => write!(f, "Could not obtain expiry from bearer token"),
            AuthError::TokenExpired => write!(f, "The bearer token has expired"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

/// Failure to verify a token or read one of its claims.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    KeyUnavailable(#[from] PublicKeyError),

    #[error("unsupported public key: {0}")]
    UnsupportedKey(String),

    #[error("claim '{0}' is missing")]
    MissingClaim(&'static str),

    #[error("claim '{claim}' is invalid: {reason}")]
    InvalidClaim { claim: &'static str, reason: String },
}
