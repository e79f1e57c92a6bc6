// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for every backend-forwarding route.
//!
//! ## Auth Flow
//!
//! 1. Client obtains access and refresh tokens from the identity service
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Gateway:
//!    - Fetches the identity service's public key (cached with TTL)
//!    - Verifies the JWT signature and standard claims
//!    - Checks the `type` claim against the route's gate
//!    - Extracts `email` and `exp`, rejecting expired tokens
//!
//! ## Security
//!
//! - Access and refresh tokens are never accepted interchangeably
//! - Verification causes are logged server-side only
//! - A request without a logger context is refused with 500

pub mod capabilities;
pub mod error;
pub mod gate;
pub mod logger;
pub mod public_key;
pub mod token;
pub mod verifier;

pub use capabilities::{ServiceClient, ServiceError, TokenInspector, TokenVerifier};
pub use error::{AuthError, TokenError};
pub use gate::{refresh_authentication, require_authentication, AuthenticationGate};
pub use logger::{attach_request_logger, LoggerContext, RequestLogger, TracingLogger};
pub use public_key::{request_public_key, PublicKeyCache, PublicKeyError};
pub use token::{AuthenticatedUser, Token, TokenType};
pub use verifier::{ClaimsInspector, PublicKeyVerifier};
