// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Claim set carried by every access token.
///
/// All three claims are required; a token missing any of them, or carrying
/// an unknown role, fails to decode instead of producing a partially filled
/// value. Claims are never mutated after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject: the principal's storage key in hyphenated UUID form
    pub sub: String,

    /// Role of the principal, which is also its storage partition
    pub role: Role,

    /// Expiration (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Claims for `subject` expiring `ttl` after `now`.
    ///
    /// `None` when the expiry falls outside the representable date range.
    pub fn new(subject: Uuid, role: Role, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            sub: subject.to_string(),
            role,
            exp: expires_at.timestamp(),
        })
    }

    /// A claim set is expired once `exp` is no longer strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Parse `sub` into the storage key type.
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
