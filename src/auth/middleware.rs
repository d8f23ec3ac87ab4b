// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gates for Axum.
//!
//! Three composable middleware functions, each terminating the pipeline on
//! failure:
//!
//! 1. [`authenticate`] - bearer token → verified [`Claims`] in request
//!    extensions
//! 2. [`require_role`] - claims role must equal the route's role
//! 3. [`validate_principal`] - claimed principal is re-loaded from the
//!    store and the fresh record is placed in request extensions
//!
//! `authenticate` must wrap the other two; they may be stacked in either
//! order. Request extensions are scoped to a single request, so nothing is
//! shared between concurrent requests.
//!
//! ```rust,ignore
//! let member_routes = Router::new()
//!     .route("/profile", get(profile))
//!     .route_layer(from_fn_with_state(PrincipalGate::new(store, Role::Member), validate_principal))
//!     .route_layer(from_fn_with_state(Role::Member, require_role))
//!     .route_layer(from_fn_with_state(auth_config, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{codec::TokenCodec, AuthError, Claims, Role};
use crate::models::Principal;
use crate::store::{PrincipalStore, StoreError};

/// Whether the authentication gate rejects tokens past their `exp`.
///
/// `Ignore` reproduces the legacy behaviour where only the signature was
/// checked. Kept selectable so both behaviours stay testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    #[default]
    Enforce,
    Ignore,
}

/// State for the authentication gate.
#[derive(Clone)]
pub struct AuthConfig {
    pub codec: Arc<TokenCodec>,
    pub expiry_policy: ExpiryPolicy,
}

impl AuthConfig {
    pub fn new(codec: Arc<TokenCodec>, expiry_policy: ExpiryPolicy) -> Self {
        Self {
            codec,
            expiry_policy,
        }
    }

    /// Verify a raw token and apply the expiry policy.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected token");
            AuthError::InvalidToken
        })?;

        if self.expiry_policy == ExpiryPolicy::Enforce && claims.is_expired_at(now) {
            debug!(sub = %claims.sub, exp = claims.exp, "Rejected expired token");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Any other header shape counts
/// as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::MissingToken),
    }
}

/// Authentication gate.
pub async fn authenticate(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;
    let claims = config.verify_at(token, Utc::now())?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Role check against claims already in the request context.
///
/// Absent claims mean the gate was composed without [`authenticate`] in
/// front of it; that is rejected, never waved through.
pub fn authorize_claims(claims: Option<&Claims>, required: Role) -> Result<(), AuthError> {
    let claims = claims.ok_or(AuthError::Unauthenticated)?;
    if claims.role.permits(required) {
        Ok(())
    } else {
        debug!(sub = %claims.sub, role = %claims.role, %required, "Role mismatch");
        Err(AuthError::Forbidden)
    }
}

/// Authorization gate. The required role is the middleware state.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize_claims(request.extensions().get::<Claims>(), required)?;
    Ok(next.run(request).await)
}

/// State for the principal validation gate.
#[derive(Clone)]
pub struct PrincipalGate {
    pub store: Arc<dyn PrincipalStore>,
    /// Partition the route expects the subject to live in
    pub kind: Role,
}

impl PrincipalGate {
    pub fn new(store: Arc<dyn PrincipalStore>, kind: Role) -> Self {
        Self { store, kind }
    }
}

/// Load the principal named by `claims.sub` from the `kind` partition.
pub async fn resolve_principal(
    store: &dyn PrincipalStore,
    kind: Role,
    claims: Option<&Claims>,
) -> Result<Principal, AuthError> {
    let claims = claims.ok_or(AuthError::Unauthenticated)?;
    let id = claims.subject_id().ok_or(AuthError::InvalidSubjectFormat)?;

    match store.find_by_id(kind, id).await {
        Ok(principal) => Ok(principal),
        Err(StoreError::NotFound) => {
            debug!(%id, %kind, "Token subject no longer exists");
            Err(AuthError::PrincipalNotFound)
        }
        Err(e) => {
            warn!(%id, %kind, error = %e, "Database error validating principal");
            Err(AuthError::StoreUnavailable(e.to_string()))
        }
    }
}

/// Principal validation gate.
pub async fn validate_principal(
    State(gate): State<PrincipalGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal =
        resolve_principal(gate.store.as_ref(), gate.kind, request.extensions().get::<Claims>())
            .await?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
