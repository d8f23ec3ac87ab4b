// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors over the request context populated by the gates.
//!
//! ```rust,ignore
//! async fn profile(CurrentMember(member): CurrentMember) -> Json<MemberProfile> {
//!     Json((&member).into())
//! }
//! ```
//!
//! Extractors never decode tokens themselves. A handler mounted without the
//! matching gate gets `AuthError::Unauthenticated`.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims};
use crate::models::{Admin, Coach, Member, Principal};

/// Verified claims set by the authentication gate.
pub struct Auth(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Principal freshly loaded by the validation gate.
pub struct CurrentPrincipal(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for CurrentPrincipal {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthError::Unauthenticated)
    }
}

macro_rules! principal_extractor {
    ($name:ident, $inner:ty, $convert:ident) => {
        pub struct $name(pub $inner);

        impl<S: Send + Sync> FromRequestParts<S> for $name {
            type Rejection = AuthError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let CurrentPrincipal(principal) =
                    CurrentPrincipal::from_request_parts(parts, state).await?;
                principal
                    .$convert()
                    .map($name)
                    .ok_or(AuthError::Unauthenticated)
            }
        }
    };
}

principal_extractor!(CurrentMember, Member, into_member);
principal_extractor!(CurrentCoach, Coach, into_coach);
principal_extractor!(CurrentAdmin, Admin, into_admin);
