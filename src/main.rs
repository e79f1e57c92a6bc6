// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use api_gateway::{
    api::router,
    auth::{AuthenticationGate, ClaimsInspector, PublicKeyCache, PublicKeyVerifier, ServiceClient},
    config::Config,
    identity::HttpIdentityClient,
    logging::init_tracing,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let client: Arc<dyn ServiceClient> =
        Arc::new(HttpIdentityClient::new(config.identity_service_url.clone())?);

    let public_keys =
        PublicKeyCache::new(client.clone()).with_cache_ttl(config.public_key_cache_ttl);

    // Warm the key cache; a failure here is retried on the first request.
    if let Err(e) = public_keys.refresh().await {
        tracing::warn!(error = %e, "Identity service unavailable at startup");
    }

    let gate = AuthenticationGate::new(
        client,
        Arc::new(PublicKeyVerifier::new(public_keys.clone())),
        Arc::new(ClaimsInspector),
    );
    let app = router(AppState::new(gate, public_keys));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        identity_service = %config.identity_service_url,
        "API gateway listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
