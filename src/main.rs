// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use cricket_academy_server::{
    api::router,
    auth::{AuthConfig, TokenCodec},
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    reminder::{LogNotifier, ReminderScheduler},
    state::AppState,
    store::InMemoryStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(InMemoryStore::new());
    if let Err(e) = store
        .seed_admin(&config.default_admin_email, &config.default_admin_password)
        .await
    {
        error!(error = %e, "Failed to seed default admin");
        return ExitCode::FAILURE;
    }

    let codec = TokenCodec::new(&config.jwt_secret);
    let auth = AuthConfig::new(Arc::new(codec), config.expiry_policy);
    let state = AppState::new(store.clone(), auth, config.token_ttl);

    let shutdown = CancellationToken::new();
    let scheduler = ReminderScheduler::new(store, Arc::new(LogNotifier))
        .with_reminder_hour(config.reminder_hour)
        .with_lead_days(config.reminder_lead_days);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown.clone()));

    let app = router(state, config.request_timeout);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        %addr,
        expiry_policy = ?config.expiry_policy,
        "Cricket academy server listening (docs at /docs)"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await;

    shutdown.cancel();
    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "Reminder scheduler task failed");
    }

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
