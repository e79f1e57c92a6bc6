// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped logging.
//!
//! Each request carries its own [`LoggerContext`] in its extensions, bound to
//! the request's correlation ID. The gate refuses to decide anything for a
//! request that has none.

use std::error::Error;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};

/// Header carrying the correlation ID (set by `SetRequestIdLayer`).
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Logger bound to one request.
pub trait RequestLogger: Send + Sync {
    fn error(&self, cause: Option<&(dyn Error + 'static)>, message: &str);

    fn info(&self, message: &str);
}

/// `tracing`-backed logger tagging every line with the correlation ID.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    correlation_id: String,
}

impl TracingLogger {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

impl RequestLogger for TracingLogger {
    fn error(&self, cause: Option<&(dyn Error + 'static)>, message: &str) {
        match cause {
            Some(cause) => tracing::error!(
                target: "gateway.auth",
                correlation_id = %self.correlation_id,
                error = %cause,
                "{message}"
            ),
            None => tracing::error!(
                target: "gateway.auth",
                correlation_id = %self.correlation_id,
                "{message}"
            ),
        }
    }

    fn info(&self, message: &str) {
        tracing::info!(
            target: "gateway.auth",
            correlation_id = %self.correlation_id,
            "{message}"
        );
    }
}

/// Request extension holding the request's logger.
#[derive(Clone)]
pub struct LoggerContext(pub Arc<dyn RequestLogger>);

impl LoggerContext {
    pub fn new(logger: impl RequestLogger + 'static) -> Self {
        Self(Arc::new(logger))
    }
}

impl std::ops::Deref for LoggerContext {
    type Target = dyn RequestLogger;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Middleware attaching a [`TracingLogger`] keyed by the request's
/// `x-request-id`.
///
/// Requests without a usable ID get a logger with an empty correlation ID
/// rather than none at all.
pub async fn attach_request_logger(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    request
        .extensions_mut()
        .insert(LoggerContext::new(TracingLogger::new(correlation_id)));

    next.run(request).await
}
