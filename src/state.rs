// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthenticationGate, PublicKeyCache};

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthenticationGate>,
    pub public_keys: PublicKeyCache,
}

impl AppState {
    pub fn new(gate: AuthenticationGate, public_keys: PublicKeyCache) -> Self {
        Self {
            gate: Arc::new(gate),
            public_keys,
        }
    }
}
