// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capabilities the authentication gate depends on.
//!
//! The gate never talks to the identity service or a crypto library
//! directly. Production implementations live in `identity` and
//! [`verifier`](super::verifier); tests substitute their own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::TokenError;
use super::token::{Token, TokenType};

/// Failure talking to the identity service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request to identity service failed: {0}")]
    Request(String),

    #[error("identity service returned HTTP {0}")]
    Status(u16),

    #[error("identity service response was invalid: {0}")]
    InvalidResponse(String),
}

/// Client for the remote identity service.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Fetch the current token signing public key (PEM).
    async fn get_public_key(&self, correlation_id: &str) -> Result<String, ServiceError>;
}

/// Verifies a bearer token's signature and standard claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Token, TokenError>;
}

/// Reads the custom claims of a verified token.
pub trait TokenInspector: Send + Sync {
    fn token_type(&self, token: &Token) -> Result<TokenType, TokenError>;

    fn email(&self, token: &Token) -> Result<String, TokenError>;

    fn expiry(&self, token: &Token) -> Result<DateTime<Utc>, TokenError>;
}
