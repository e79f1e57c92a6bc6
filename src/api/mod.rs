// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{attach_request_logger, refresh_authentication, require_authentication},
    state::AppState,
};

pub mod health;
pub mod session;

pub fn router(state: AppState) -> Router {
    let access_routes = Router::new()
        .route("/session", get(session::current_session))
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_authentication,
        ));

    let refresh_routes = Router::new()
        .route("/session/refresh", get(session::refresh_session))
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            refresh_authentication,
        ));

    let health_routes = Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", access_routes.merge(refresh_routes))
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(attach_request_logger))
                .layer(CorsLayer::permissive()),
        )
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::readiness,
        session::current_session,
        session::refresh_session
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks,
            session::SessionResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Session", description = "Authenticated session identity")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::verifier::test_keys::{sign, PUBLIC_KEY_PEM};
    use crate::auth::{
        AuthenticationGate, ClaimsInspector, PublicKeyCache, PublicKeyVerifier, ServiceClient,
        ServiceError,
    };

    struct StaticIdentityService {
        key: Option<&'static str>,
    }

    #[async_trait]
    impl ServiceClient for StaticIdentityService {
        async fn get_public_key(&self, _correlation_id: &str) -> Result<String, ServiceError> {
            self.key
                .map(str::to_string)
                .ok_or_else(|| ServiceError::Status(503))
        }
    }

    fn app_with_key(key: Option<&'static str>) -> Router {
        let client: Arc<dyn ServiceClient> = Arc::new(StaticIdentityService { key });
        let public_keys = PublicKeyCache::new(client.clone());
        let gate = AuthenticationGate::new(
            client,
            Arc::new(PublicKeyVerifier::new(public_keys.clone())),
            Arc::new(ClaimsInspector),
        );
        router(AppState::new(gate, public_keys))
    }

    fn app() -> Router {
        app_with_key(Some(PUBLIC_KEY_PEM))
    }

    fn token(token_type: &str, exp_offset_secs: i64) -> String {
        sign(&json!({
            "type": token_type,
            "email": "test@email.com",
            "exp": Utc::now().timestamp() + exp_offset_secs,
        }))
    }

    async fn get(app: Router, uri: &str, authorization: Option<String>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn openapi_document_lists_gated_routes() {
        let (status, body) = get(app(), "/api-doc/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/v1/session"].is_object());
        assert!(body["paths"]["/v1/session/refresh"].is_object());
        assert!(body["components"]["securitySchemes"]["bearer"].is_object());
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let (status, body) = get(app(), "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_identity_service() {
        let (status, body) = get(app(), "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["public_key"], "ok");

        let (status, body) = get(app_with_key(None), "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn session_requires_authorization_header() {
        let (status, body) = get(app(), "/v1/session", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn session_accepts_signed_access_token() {
        let header = format!("Bearer {}", token("AccessTokenType", 60));

        let (status, body) = get(app(), "/v1/session", Some(header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "test@email.com");
        assert_eq!(body["token_type"], "AccessTokenType");
    }

    #[tokio::test]
    async fn session_rejects_refresh_token() {
        let header = format!("Bearer {}", token("RefreshTokenType", 60));

        let (status, body) = get(app(), "/v1/session", Some(header)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "wrong_token_type");
    }

    #[tokio::test]
    async fn refresh_session_accepts_refresh_token() {
        let header = format!("Bearer {}", token("RefreshTokenType", 60));

        let (status, body) = get(app(), "/v1/session/refresh", Some(header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "RefreshTokenType");
    }

    #[tokio::test]
    async fn tampered_token_does_not_leak_cause() {
        let mut forged = token("AccessTokenType", 60);
        forged.push('x');

        let (status, body) = get(app(), "/v1/session", Some(format!("Bearer {forged}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "The bearer token was invalid");
    }

    #[tokio::test]
    async fn unavailable_public_key_rejects_token() {
        let header = format!("Bearer {}", token("AccessTokenType", 60));

        let (status, body) = get(app_with_key(None), "/v1/session", Some(header)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "invalid_token");
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .header("x-request-id", "example-correlation-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["x-request-id"],
            "example-correlation-id"
        );
    }
}
