// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the identity service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::auth::{ServiceClient, ServiceError};

/// Header used to forward the correlation ID to backends.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

const PUBLIC_KEY_PATH: &str = "v1/public-key";

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    public_key: String,
}

/// Identity service client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
    base_url: Url,
    http: Client,
}

impl HttpIdentityClient {
    pub fn new(base_url: Url) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Endpoint serving the public key.
    pub fn public_key_url(&self) -> Result<Url, ServiceError> {
        self.base_url
            .join(PUBLIC_KEY_PATH)
            .map_err(|e| ServiceError::Request(format!("invalid public key URL: {e}")))
    }
}

#[async_trait]
impl ServiceClient for HttpIdentityClient {
    async fn get_public_key(&self, correlation_id: &str) -> Result<String, ServiceError> {
        let response = self
            .http
            .get(self.public_key_url()?)
            .header(CORRELATION_ID_HEADER, correlation_id)
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body: PublicKeyResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        if body.public_key.is_empty() {
            return Err(ServiceError::InvalidResponse(
                "public key was empty".to_string(),
            ));
        }

        Ok(body.public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_url_is_relative_to_base() {
        let client = HttpIdentityClient::new(Url::parse("https://identity.internal/").unwrap())
            .unwrap();
        assert_eq!(
            client.public_key_url().unwrap().as_str(),
            "https://identity.internal/v1/public-key"
        );
    }

    #[test]
    fn public_key_url_keeps_base_path() {
        let client =
            HttpIdentityClient::new(Url::parse("https://gateway.internal/identity/").unwrap())
                .unwrap();
        assert_eq!(
            client.public_key_url().unwrap().as_str(),
            "https://gateway.internal/identity/v1/public-key"
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_request_error() {
        let client = HttpIdentityClient::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();

        let result = client.get_public_key("example-correlation-id").await;

        assert!(matches!(result, Err(ServiceError::Request(_))));
    }
}
