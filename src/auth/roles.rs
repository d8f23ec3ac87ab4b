// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Principal roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Principal roles.
///
/// A role is also the storage partition a principal lives in, so the same
/// value selects both the authorization requirement of a route and the
/// collection a lookup goes to.
///
/// - `Admin` - Academy administrators (member and coach management)
/// - `Coach` - Coaching staff
/// - `Member` - Enrolled cricketers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Academy administrator
    Admin,
    /// Coaching staff
    Coach,
    /// Enrolled member. Older tokens call this role `cricketer`.
    #[serde(alias = "cricketer")]
    Member,
}

impl Role {
    /// Exact-match check. There is no role hierarchy: an admin token does
    /// not open member routes.
    pub fn permits(&self, required: Role) -> bool {
        *self == required
    }

    /// Parse role from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "coach" => Some(Role::Coach),
            "member" | "cricketer" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::Member => "member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
