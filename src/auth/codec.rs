// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token encoding and signature verification.
//!
//! The codec only answers "was this signed by us and does it parse". Expiry
//! is a temporal concern checked by the authentication gate, so
//! [`TokenCodec::verify`] accepts expired tokens.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use crate::config::SigningSecret;

/// Token codec errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Signs and verifies claim sets with a process-wide secret.
///
/// Built once at startup from [`SigningSecret`] and shared read-only
/// behind an `Arc`; there is no way to swap the key afterwards.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.expose().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose().as_bytes()),
            validation,
        }
    }

    /// Serialize and sign `claims` into a compact three-segment token.
    pub fn issue(&self, claims: &Claims) -> Result<String, CodecError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }

    /// Check the signature and decode the claim set. Does not look at `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, CodecError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => CodecError::InvalidSignature,
                _ => CodecError::Malformed,
            })
    }
}
