// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public key retrieval from the identity service, with caching.
//!
//! ## Usage
//!
//! `request_public_key` is a single uncached call. `PublicKeyCache` wraps it
//! with a TTL and is what the token verifier and readiness probe use.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use super::capabilities::{ServiceClient, ServiceError};

/// Default public key cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
pub enum PublicKeyError {
    #[error("Could not obtain public key: {0}")]
    PublicKeyRequestFailed(#[source] ServiceError),
}

/// Request the current signing public key from the identity service.
///
/// No retries; the transport owns any retry policy.
pub async fn request_public_key(
    client: &dyn ServiceClient,
    correlation_id: &str,
) -> Result<String, PublicKeyError> {
    client
        .get_public_key(correlation_id)
        .await
        .map_err(PublicKeyError::PublicKeyRequestFailed)
}

struct CacheEntry {
    key: String,
    fetched_at: Instant,
}

/// Public key cache in front of the identity service.
#[derive(Clone)]
pub struct PublicKeyCache {
    client: Arc<dyn ServiceClient>,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<CacheEntry>>>,
}

impl PublicKeyCache {
    pub fn new(client: Arc<dyn ServiceClient>) -> Self {
        Self {
            client,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Get the public key, fetching it if the cache is empty or stale.
    pub async fn get(&self) -> Result<String, PublicKeyError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    return Ok(entry.key.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Force a fetch and replace the cached key.
    pub async fn refresh(&self) -> Result<String, PublicKeyError> {
        let correlation_id = Uuid::new_v4().to_string();
        let key = request_public_key(self.client.as_ref(), &correlation_id).await?;

        tracing::debug!(
            target: "gateway.auth.public_key",
            correlation_id = %correlation_id,
            "Fetched public key from identity service"
        );

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            key: key.clone(),
            fetched_at: Instant::now(),
        });
        Ok(key)
    }

    /// Check if a key is currently cached and fresh.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::sync::Mutex;

    use async_trait::async_trait;

    struct StubServiceClient {
        response: Result<String, String>,
        correlation_ids: Mutex<Vec<String>>,
    }

    impl StubServiceClient {
        fn returning(response: Result<&str, &str>) -> Self {
            Self {
                response: response.map(str::to_string).map_err(str::to_string),
                correlation_ids: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.correlation_ids.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ServiceClient for StubServiceClient {
        async fn get_public_key(&self, correlation_id: &str) -> Result<String, ServiceError> {
            self.correlation_ids
                .lock()
                .unwrap()
                .push(correlation_id.to_string());
            self.response.clone().map_err(ServiceError::Request)
        }
    }

    #[tokio::test]
    async fn request_public_key_error() {
        let client = StubServiceClient::returning(Err("example error"));

        let err = request_public_key(&client, "example-correlation-id")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Could not obtain public key: request to identity service failed: example error"
        );
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn request_public_key_success() {
        let client = StubServiceClient::returning(Ok("example-key"));

        let key = request_public_key(&client, "example-correlation-id")
            .await
            .unwrap();

        assert_eq!(key, "example-key");
        assert_eq!(
            client.correlation_ids.lock().unwrap().as_slice(),
            ["example-correlation-id".to_string()]
        );
    }

    #[tokio::test]
    async fn cache_serves_repeat_requests() {
        let client = Arc::new(StubServiceClient::returning(Ok("example-key")));
        let cache = PublicKeyCache::new(client.clone());
        assert!(!cache.is_cached().await);

        assert_eq!(cache.get().await.unwrap(), "example-key");
        assert_eq!(cache.get().await.unwrap(), "example-key");

        assert!(cache.is_cached().await);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn stale_cache_is_refetched() {
        let client = Arc::new(StubServiceClient::returning(Ok("example-key")));
        let cache = PublicKeyCache::new(client.clone()).with_cache_ttl(Duration::ZERO);

        cache.get().await.unwrap();
        cache.get().await.unwrap();

        assert!(!cache.is_cached().await);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_cache_empty() {
        let client = Arc::new(StubServiceClient::returning(Err("unavailable")));
        let cache = PublicKeyCache::new(client);

        assert!(matches!(
            cache.get().await,
            Err(PublicKeyError::PublicKeyRequestFailed(_))
        ));
        assert!(!cache.is_cached().await);
    }
}
