// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Gate failure. Every variant terminates the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token on a protected request
    MissingToken,
    /// Signature mismatch, unparseable token, or non-bearer header
    InvalidToken,
    /// Token is past its `exp` and expiry is enforced
    TokenExpired,
    /// A gate or extractor ran without claims in the request context
    Unauthenticated,
    /// Claimed role differs from the route's required role
    Forbidden,
    /// `sub` is not a valid storage key
    InvalidSubjectFormat,
    /// The claimed principal no longer exists
    PrincipalNotFound,
    /// Principal lookup failed for a reason other than absence
    StoreUnavailable(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::InvalidSubjectFormat => "invalid_subject_format",
            AuthError::PrincipalNotFound => "principal_not_found",
            AuthError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::Unauthenticated
            | AuthError::InvalidSubjectFormat => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::PrincipalNotFound => StatusCode::NOT_FOUND,
            AuthError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No token found"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::Unauthenticated => write!(f, "Unauthorized"),
            AuthError::Forbidden => write!(f, "Forbidden"),
            AuthError::InvalidSubjectFormat => write!(f, "Invalid principal ID format in token"),
            AuthError::PrincipalNotFound => write!(f, "Principal not found"),
            // Store details are logged by the gate, not sent to clients.
            AuthError::StoreUnavailable(_) => write!(f, "Database error"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
