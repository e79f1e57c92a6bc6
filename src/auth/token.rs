// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified tokens and the identity attached to authenticated requests.

use std::fmt;

use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Claim value carried by access tokens.
pub const ACCESS_TOKEN_TYPE: &str = "AccessTokenType";

/// Claim value carried by refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "RefreshTokenType";

/// The intended use of a token, as stated by its `type` claim.
///
/// Anything other than the two known values is kept verbatim so it can be
/// reported, but it is never accepted by either gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenType {
    /// Authorizes ordinary API requests
    Access,
    /// Authorizes only the acquisition of a new access token
    Refresh,
    /// Unrecognised type claim
    Other(String),
}

impl TokenType {
    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Access => ACCESS_TOKEN_TYPE,
            TokenType::Refresh => REFRESH_TOKEN_TYPE,
            TokenType::Other(value) => value,
        }
    }
}

impl From<&str> for TokenType {
    fn from(value: &str) -> Self {
        match value {
            ACCESS_TOKEN_TYPE => TokenType::Access,
            REFRESH_TOKEN_TYPE => TokenType::Refresh,
            other => TokenType::Other(other.to_string()),
        }
    }
}

impl From<String> for TokenType {
    fn from(value: String) -> Self {
        match value.as_str() {
            ACCESS_TOKEN_TYPE => TokenType::Access,
            REFRESH_TOKEN_TYPE => TokenType::Refresh,
            _ => TokenType::Other(value),
        }
    }
}

impl From<TokenType> for String {
    fn from(value: TokenType) -> Self {
        match value {
            TokenType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bearer token whose signature and standard claims have been verified.
///
/// Custom claims are only read through a
/// [`TokenInspector`](super::TokenInspector).
#[derive(Debug, Clone)]
pub struct Token {
    header: Header,
    claims: Map<String, Value>,
}

impl Token {
    pub fn new(header: Header, claims: Map<String, Value>) -> Self {
        Self { header, claims }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Look up a raw claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}

/// Identity of the caller, attached to request extensions once the gate lets
/// a request through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject email from the token
    pub email: String,
    /// Which gate admitted the request
    #[schema(value_type = String, example = "AccessTokenType")]
    pub token_type: TokenType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_token_types() {
        assert_eq!(TokenType::from("AccessTokenType"), TokenType::Access);
        assert_eq!(TokenType::from("RefreshTokenType"), TokenType::Refresh);
    }

    #[test]
    fn unknown_type_is_kept_verbatim() {
        let parsed = TokenType::from("invalid-type".to_string());
        assert_eq!(parsed, TokenType::Other("invalid-type".to_string()));
        assert_eq!(parsed.to_string(), "invalid-type");
    }

    #[test]
    fn type_matching_is_case_sensitive() {
        assert_eq!(
            TokenType::from("accesstokentype"),
            TokenType::Other("accesstokentype".to_string())
        );
    }

    #[test]
    fn serializes_as_claim_string() {
        let json = serde_json::to_string(&TokenType::Refresh).unwrap();
        assert_eq!(json, r#""RefreshTokenType""#);
    }
}
