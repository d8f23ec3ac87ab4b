// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Due-Date Reminder Scheduler
//!
//! Background task that reminds members whose payment is due soon.
//!
//! ## Strategy
//!
//! On start the scheduler scans once, then sleeps until the next
//! `reminder_hour:00` local time (tomorrow if that instant has already been
//! reached today) and scans again, forever. Each tick:
//! 1. Lists all members (`Scanning`). A failed fetch is logged and the tick
//!    is skipped; it is not retried before the next scheduled tick.
//! 2. For every member with a due date, counts calendar days from today to
//!    the due date (`Evaluating`). Exactly `lead_days` (default 2) emits a
//!    [`ReminderEvent`]. Members without a due date are skipped.
//! 3. Hands each event to the [`ReminderNotifier`].
//!
//! ## Delivery semantics
//!
//! No reminder history is kept, so a restart on a reminder day re-emits the
//! same events: delivery is at-least-once. Each event carries an
//! idempotency key (member, due date, tick day) that a notifier can use to
//! deduplicate.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::Role;
use crate::models::Member;
use crate::store::{PrincipalStore, StoreError};

/// Default local hour of the daily scan.
pub const DEFAULT_REMINDER_HOUR: u32 = 11;

/// Default number of days before the due date that triggers a reminder.
pub const DEFAULT_LEAD_DAYS: i64 = 2;

/// Scheduler lifecycle. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick
    Idle,
    /// Fetching all members
    Scanning,
    /// Checking due dates
    Evaluating,
}

/// A member whose due date is `lead_days` away at tick time. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    pub member_id: Uuid,
    pub member_name: String,
    pub due_date: DateTime<Utc>,
    /// `{member_id}:{due day}:{tick day}`, stable across repeated ticks on
    /// the same day
    pub idempotency_key: String,
}

#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Delivery of reminder events (email, SMS, push...).
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn notify(&self, event: &ReminderEvent) -> Result<(), NotifyError>;
}

/// Notifier that only writes the reminder to the log.
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, event: &ReminderEvent) -> Result<(), NotifyError> {
        info!(
            member_id = %event.member_id,
            member_name = %event.member_name,
            due_date = %event.due_date.format("%Y-%m-%d"),
            idempotency_key = %event.idempotency_key,
            "Sending fee reminder"
        );
        Ok(())
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Members fetched
    pub scanned: usize,
    /// Events emitted
    pub reminded: usize,
    /// Events the notifier failed to deliver
    pub failed: usize,
}

/// Calendar days from `now`'s date to the due date, both taken in `now`'s
/// time zone. Negative once the due date has passed.
pub fn days_until_due<Tz: TimeZone>(due_date: DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let due_day = due_date.with_timezone(&now.timezone()).date_naive();
    (due_day - now.date_naive()).num_days()
}

/// Next instant at `hour:00:00` in `now`'s time zone that is strictly after
/// `now`. Days on which that wall-clock time does not exist (DST gap) are
/// skipped.
pub fn next_tick_after<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let hour = hour.min(23);
    let mut day: NaiveDate = now.date_naive();
    loop {
        let candidate = day
            .and_hms_opt(hour, 0, 0)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest());
        if let Some(candidate) = candidate {
            if candidate > *now {
                return candidate;
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => return now.clone(),
        }
    }
}

/// Reminder events due for `members` at `now`.
pub fn due_reminders<Tz: TimeZone>(
    members: &[Member],
    now: &DateTime<Tz>,
    lead_days: i64,
) -> Vec<ReminderEvent> {
    let today = now.date_naive();
    members
        .iter()
        .filter_map(|member| {
            let due_date = member.due_date?;
            if days_until_due(due_date, now) != lead_days {
                return None;
            }
            let due_day = due_date.with_timezone(&now.timezone()).date_naive();
            Some(ReminderEvent {
                member_id: member.id,
                member_name: member.name.clone(),
                due_date,
                idempotency_key: format!("{}:{}:{}", member.id, due_day, today),
            })
        })
        .collect()
}

/// Daily due-date reminder job.
pub struct ReminderScheduler {
    store: Arc<dyn PrincipalStore>,
    notifier: Arc<dyn ReminderNotifier>,
    reminder_hour: u32,
    lead_days: i64,
    state: watch::Sender<SchedulerState>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn PrincipalStore>, notifier: Arc<dyn ReminderNotifier>) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            store,
            notifier,
            reminder_hour: DEFAULT_REMINDER_HOUR,
            lead_days: DEFAULT_LEAD_DAYS,
            state,
        }
    }

    /// Local hour of the daily scan (0-23).
    pub fn with_reminder_hour(mut self, hour: u32) -> Self {
        self.reminder_hour = hour.min(23);
        self
    }

    pub fn with_lead_days(mut self, days: i64) -> Self {
        self.lead_days = days;
        self
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Run the scheduler loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(scheduler.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            hour = self.reminder_hour,
            lead_days = self.lead_days,
            "Reminder scheduler starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Reminder scheduler shutting down");
                return;
            }

            // Failures are logged inside the tick.
            let _ = self.tick_at(&Local::now()).await;

            let now = Local::now();
            let next = next_tick_after(&now, self.reminder_hour);
            let wait = next.signed_duration_since(now).to_std().unwrap_or_default();
            debug!(next = %next, wait_secs = wait.as_secs(), "Next reminder scan scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {},
                _ = shutdown.cancelled() => {
                    info!("Reminder scheduler shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one scan-and-evaluate cycle as of `now`.
    pub async fn tick_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TickReport, StoreError>
    where
        Tz::Offset: Send + Sync,
    {
        self.state.send_replace(SchedulerState::Scanning);
        let principals = match self.store.list_all(Role::Member).await {
            Ok(principals) => principals,
            Err(e) => {
                warn!(error = %e, "Error fetching members for reminders");
                self.state.send_replace(SchedulerState::Idle);
                return Err(e);
            }
        };

        self.state.send_replace(SchedulerState::Evaluating);
        let members: Vec<Member> = principals
            .into_iter()
            .filter_map(|p| p.into_member())
            .collect();
        let events = due_reminders(&members, now, self.lead_days);

        let mut report = TickReport {
            scanned: members.len(),
            ..TickReport::default()
        };
        for event in &events {
            match self.notifier.notify(event).await {
                Ok(()) => report.reminded += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(member_id = %event.member_id, error = %e, "Failed to send reminder");
                }
            }
        }

        self.state.send_replace(SchedulerState::Idle);
        info!(
            scanned = report.scanned,
            reminded = report.reminded,
            failed = report.failed,
            "Reminder scan complete"
        );
        Ok(report)
    }
}
