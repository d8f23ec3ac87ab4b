// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{AuthConfig, PrincipalGate, Role};
use crate::store::{PrincipalStore, RecordStore};

/// Shared state for handlers and gates. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub principals: Arc<dyn PrincipalStore>,
    pub records: Arc<RwLock<RecordStore>>,
    pub auth: AuthConfig,
    /// Lifetime of tokens issued at login
    pub token_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        auth: AuthConfig,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self {
            principals,
            records: Arc::new(RwLock::new(RecordStore::new())),
            auth,
            token_ttl,
        }
    }

    /// Principal validation gate state for `kind`.
    pub fn principal_gate(&self, kind: Role) -> PrincipalGate {
        PrincipalGate::new(self.principals.clone(), kind)
    }
}
