// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `IDENTITY_SERVICE_URL` | Base URL of the identity service | Required |
//! | `PUBLIC_KEY_CACHE_TTL_SECS` | How long a fetched public key is reused | `300` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::auth::public_key::DEFAULT_CACHE_TTL;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const IDENTITY_SERVICE_URL_ENV: &str = "IDENTITY_SERVICE_URL";
pub const PUBLIC_KEY_CACHE_TTL_ENV: &str = "PUBLIC_KEY_CACHE_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub identity_service_url: Url,
    pub public_key_cache_ttl: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: HOST_ENV,
                reason: e.to_string(),
            })?;

        let raw_url = lookup(IDENTITY_SERVICE_URL_ENV)
            .ok_or(ConfigError::Missing(IDENTITY_SERVICE_URL_ENV))?;
        let identity_service_url = parse_base_url(&raw_url)?;

        let public_key_cache_ttl = match lookup(PUBLIC_KEY_CACHE_TTL_ENV) {
            Some(secs) => Duration::from_secs(secs.parse().map_err(
                |e: std::num::ParseIntError| ConfigError::Invalid {
                    name: PUBLIC_KEY_CACHE_TTL_ENV,
                    reason: e.to_string(),
                },
            )?),
            None => DEFAULT_CACHE_TTL,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected 'json' or 'pretty', got '{other}'"),
                })
            }
        };

        Ok(Self {
            bind_addr,
            identity_service_url,
            public_key_cache_ttl,
            log_format,
        })
    }
}

/// Parse a base URL, ensuring a trailing slash so relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| ConfigError::Invalid {
        name: IDENTITY_SERVICE_URL_ENV,
        reason: e.to_string(),
    })
}
