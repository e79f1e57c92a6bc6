// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT verification against the identity service's public key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use super::capabilities::{TokenInspector, TokenVerifier};
use super::error::TokenError;
use super::public_key::PublicKeyCache;
use super::token::{Token, TokenType};

/// Claim holding the token type.
pub const TYPE_CLAIM: &str = "type";
/// Claim holding the subject email.
pub const EMAIL_CLAIM: &str = "email";
/// Claim holding the expiry (unix seconds).
pub const EXPIRY_CLAIM: &str = "exp";

/// Verifies tokens with the PEM public key published by the identity service.
#[derive(Clone)]
pub struct PublicKeyVerifier {
    keys: PublicKeyCache,
}

impl PublicKeyVerifier {
    pub fn new(keys: PublicKeyCache) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl TokenVerifier for PublicKeyVerifier {
    async fn verify(&self, token: &str) -> Result<Token, TokenError> {
        let pem = self.keys.get().await?;
        let (decoding_key, algorithms) = decoding_key_from_pem(&pem)?;

        let mut validation = Validation::new(algorithms[0]);
        validation.algorithms = algorithms;
        // The gate applies its own strict expiry check.
        validation.leeway = 0;
        validation.validate_aud = false;

        let token_data = decode::<Map<String, Value>>(token, &decoding_key, &validation)?;
        Ok(Token::new(token_data.header, token_data.claims))
    }
}

/// Convert a PEM public key into a decoding key and the algorithms it may verify.
fn decoding_key_from_pem(pem: &str) -> Result<(DecodingKey, Vec<Algorithm>), TokenError> {
    if let Ok(key) = DecodingKey::from_rsa_pem(pem.as_bytes()) {
        return Ok((key, vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512]));
    }

    let key = DecodingKey::from_ec_pem(pem.as_bytes())
        .map_err(|e| TokenError::UnsupportedKey(e.to_string()))?;
    Ok((key, vec![Algorithm::ES256, Algorithm::ES384]))
}

/// Reads the gateway's custom claims from a verified token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsInspector;

impl ClaimsInspector {
    fn string_claim(token: &Token, claim: &'static str) -> Result<String, TokenError> {
        match token.claim(claim) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(TokenError::InvalidClaim {
                claim,
                reason: format!("expected a string, found {other}"),
            }),
            None => Err(TokenError::MissingClaim(claim)),
        }
    }
}

impl TokenInspector for ClaimsInspector {
    fn token_type(&self, token: &Token) -> Result<TokenType, TokenError> {
        Self::string_claim(token, TYPE_CLAIM).map(TokenType::from)
    }

    fn email(&self, token: &Token) -> Result<String, TokenError> {
        Self::string_claim(token, EMAIL_CLAIM)
    }

    fn expiry(&self, token: &Token) -> Result<DateTime<Utc>, TokenError> {
        let value = token
            .claim(EXPIRY_CLAIM)
            .ok_or(TokenError::MissingClaim(EXPIRY_CLAIM))?;

        let seconds = value.as_i64().ok_or_else(|| TokenError::InvalidClaim {
            claim: EXPIRY_CLAIM,
            reason: format!("expected unix seconds, found {value}"),
        })?;

        DateTime::from_timestamp(seconds, 0).ok_or_else(|| TokenError::InvalidClaim {
            claim: EXPIRY_CLAIM,
            reason: format!("timestamp {seconds} is out of range"),
        })
    }
}
