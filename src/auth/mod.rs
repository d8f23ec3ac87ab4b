// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuance, verification and the role-gated request pipeline.
//!
//! ## Auth Flow
//!
//! 1. A login endpoint verifies credentials against the stored argon2 hash
//!    and issues an HS256 token carrying `sub`, `role` and `exp`
//! 2. The client sends `Authorization: Bearer <token>` on protected routes
//! 3. The server:
//!    - verifies the signature with the process-wide secret
//!    - checks `exp` (unless expiry enforcement is switched off)
//!    - checks the role required by the route
//!    - re-loads the principal so handlers see current state
//!
//! ## Security
//!
//! - The signing secret is loaded once at startup and never rotated in-process
//! - Principal validation runs on every request, so removing a principal
//!   locks out its tokens before they expire

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;

pub use claims::Claims;
pub use codec::{CodecError, TokenCodec};
pub use error::AuthError;
pub use extractor::{Auth, CurrentAdmin, CurrentCoach, CurrentMember, CurrentPrincipal};
pub use middleware::{AuthConfig, ExpiryPolicy, PrincipalGate};
pub use roles::Role;
