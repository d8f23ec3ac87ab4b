// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cricket Academy Server - membership backend for a coaching academy
//!
//! Members, coaches and administrators authenticate with HS256 bearer
//! tokens. Protected routes pass through three gates (authenticate,
//! authorize, validate principal). A daily background job reminds members
//! whose payment due date is approaching.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token codec, request gates and password hashing
//! - `reminder` - Due-date reminder scheduler
//! - `store` - Principal and record storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod reminder;
pub mod state;
pub mod store;
