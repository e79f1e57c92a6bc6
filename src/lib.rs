// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API Gateway - HTTP/JSON front door for gRPC backend services
//!
//! Every request to a backend-forwarding route is classified as
//! access-authenticated, refresh-authenticated or rejected before it is
//! forwarded.
//!
//! ## Modules
//!
//! - `api` - HTTP routes (Axum)
//! - `auth` - Bearer token authentication gate
//! - `identity` - Identity service client
//! - `config` - Environment configuration
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod identity;
pub mod logging;
pub mod state;
