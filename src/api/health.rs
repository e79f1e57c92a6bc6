// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::logger::REQUEST_ID_HEADER;
use crate::auth::request_public_key;
use crate::state::AppState;

/// Readiness response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Whether the identity service hands out a public key.
    pub public_key: String,
    /// Whether a fresh public key is cached for token verification.
    pub public_key_cached: bool,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// Asks the identity service for its public key, uncached. Returns 503 if
/// the key cannot be obtained, since no token could be verified.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<ReadyResponse>) {
    let correlation_id = headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let public_key_ok =
        match request_public_key(state.gate.service_client().as_ref(), &correlation_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(correlation_id = %correlation_id, error = %e, "Readiness check failed");
                false
            }
        };

    let response = ReadyResponse {
        status: if public_key_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            public_key: if public_key_ok { "ok" } else { "unavailable" }.to_string(),
            public_key_cached: state.public_keys.is_cached().await,
        },
    };

    let status = if public_key_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
