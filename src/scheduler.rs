// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Daily trigger for scripture generation
//!
//! Fires once per local day at a wall-clock time in the scripture
//! timezone, so the day's entry usually exists before the first reader
//! asks for it.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::scripture::{Clock, DailyResolver};

/// Longest daylight-saving gap searched for a valid local time
const MAX_GAP_MINUTES: i64 = 180;

/// First instant strictly after `now` whose local time in `tz` is `at`.
///
/// A local time that does not exist (spring-forward gap) moves to the
/// first valid minute after it; an ambiguous one (fall-back overlap) uses
/// the earlier instant.
pub fn next_fire_after(now: DateTime<Utc>, tz: Tz, at: NaiveTime) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();

    for _ in 0..3 {
        if let Some(fire) = local_instant(tz, date.and_time(at)) {
            if fire > now {
                return fire;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    now + ChronoDuration::days(1)
}

fn local_instant(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            tz.from_local_datetime(&(local + ChronoDuration::minutes(minutes)))
                .earliest()
        })
        .map(|instant| instant.with_timezone(&Utc))
}

/// Background task that resolves today's scripture once a day
pub struct DailyScheduler {
    resolver: Arc<DailyResolver>,
    clock: Arc<dyn Clock>,
    at: NaiveTime,
}

impl DailyScheduler {
    pub fn new(resolver: Arc<DailyResolver>, clock: Arc<dyn Clock>, at: NaiveTime) -> Self {
        Self {
            resolver,
            clock,
            at,
        }
    }

    /// Next fire time after the clock's current instant
    pub fn next_fire(&self) -> DateTime<Utc> {
        next_fire_after(self.clock.now(), self.resolver.timezone(), self.at)
    }

    /// Run until `shutdown` becomes true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let tz = self.resolver.timezone();

        loop {
            let now = self.clock.now();
            let fire = next_fire_after(now, tz, self.at);
            let wait = (fire - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(
                next_run = %fire.with_timezone(&tz),
                wait_secs = wait.as_secs(),
                "daily scripture run scheduled"
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    // Outcome is logged by the resolver; the loop carries on either way.
                    let _ = self.resolver.run_scheduled().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("daily scheduler stopped");
                        return;
                    }
                }
            }
        }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
