// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. A missing
//! signing secret is fatal: no protected route is safe without it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 token signing secret | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_TTL_HOURS` | Lifetime of issued tokens (1 to 87600) | `24` |
//! | `ENFORCE_TOKEN_EXPIRY` | Reject expired tokens at the auth gate | `true` |
//! | `REMINDER_HOUR` | Local hour of the daily reminder scan | `11` |
//! | `REMINDER_LEAD_DAYS` | Days before the due date that trigger a reminder | `2` |
//! | `REQUEST_TIMEOUT_SECS` | Per-request deadline (bounds store lookups) | `10` |
//! | `DEFAULT_ADMIN_EMAIL` | Seeded admin email | `admin@example.com` |
//! | `DEFAULT_ADMIN_PASSWORD` | Seeded admin password | `admin123` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::time::Duration;

use crate::auth::ExpiryPolicy;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TOKEN_TTL_HOURS_ENV: &str = "TOKEN_TTL_HOURS";
pub const ENFORCE_TOKEN_EXPIRY_ENV: &str = "ENFORCE_TOKEN_EXPIRY";
pub const REMINDER_HOUR_ENV: &str = "REMINDER_HOUR";
pub const REMINDER_LEAD_DAYS_ENV: &str = "REMINDER_LEAD_DAYS";
pub const REQUEST_TIMEOUT_SECS_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const DEFAULT_ADMIN_EMAIL_ENV: &str = "DEFAULT_ADMIN_EMAIL";
pub const DEFAULT_ADMIN_PASSWORD_ENV: &str = "DEFAULT_ADMIN_PASSWORD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Upper bound for `TOKEN_TTL_HOURS` (ten years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Token signing secret. Never printed.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    /// Rejects empty or whitespace-only secrets.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::Missing(JWT_SECRET_ENV));
        }
        Ok(Self(secret))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: SigningSecret,
    pub host: String,
    pub port: u16,
    pub token_ttl: chrono::Duration,
    pub expiry_policy: ExpiryPolicy,
    pub reminder_hour: u32,
    pub reminder_lead_days: i64,
    pub request_timeout: Duration,
    pub default_admin_email: String,
    pub default_admin_password: String,
}

impl AppConfig {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let enforce: bool = parse_or(&lookup, ENFORCE_TOKEN_EXPIRY_ENV, true)?;
        let reminder_hour: u32 = parse_or(&lookup, REMINDER_HOUR_ENV, 11)?;
        if reminder_hour > 23 {
            return Err(ConfigError::Invalid {
                var: REMINDER_HOUR_ENV,
                value: reminder_hour.to_string(),
            });
        }
        let ttl_hours: i64 = parse_or(&lookup, TOKEN_TTL_HOURS_ENV, 24)?;
        let token_ttl = (1..=MAX_TOKEN_TTL_HOURS)
            .contains(&ttl_hours)
            .then(|| chrono::TimeDelta::try_hours(ttl_hours))
            .flatten()
            .ok_or_else(|| ConfigError::Invalid {
                var: TOKEN_TTL_HOURS_ENV,
                value: ttl_hours.to_string(),
            })?;

        Ok(Self {
            jwt_secret: SigningSecret::new(jwt_secret)?,
            host: lookup(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, PORT_ENV, 8080)?,
            token_ttl,
            expiry_policy: if enforce {
                ExpiryPolicy::Enforce
            } else {
                ExpiryPolicy::Ignore
            },
            reminder_hour,
            reminder_lead_days: parse_or(&lookup, REMINDER_LEAD_DAYS_ENV, 2)?,
            request_timeout: Duration::from_secs(parse_or(&lookup, REQUEST_TIMEOUT_SECS_ENV, 10)?),
            default_admin_email: lookup(DEFAULT_ADMIN_EMAIL_ENV)
                .unwrap_or_else(|| "admin@example.com".to_string()),
            default_admin_password: lookup(DEFAULT_ADMIN_PASSWORD_ENV)
                .unwrap_or_else(|| "admin123".to_string()),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
