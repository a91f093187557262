// weather_dash - Terminal weather dashboard for the Visual Crossing forecast API
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// How often the displayed date and time are recomputed.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Source of wall-clock time for the dashboard.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the host's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTime {
    pub date: String,
    pub time: String,
}

impl DisplayTime {
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        DisplayTime {
            date: dt.format("%A, %-d, %B").to_string(),
            time: dt.format("%-I:%M %p").to_string(),
        }
    }
}

/// Owned handle for the periodic clock refresh.
///
/// The current value is computed as soon as the ticker is started and then again
/// every `REFRESH_INTERVAL`. The timer task is aborted when the ticker is stopped
/// or dropped, so no refresh can happen after its owner is gone.
#[derive(Debug)]
pub struct Ticker {
    task: JoinHandle<()>,
    rx: watch::Receiver<DisplayTime>,
}

impl Ticker {
    /// Start refreshing every `REFRESH_INTERVAL`.
    ///
    /// # Panics
    ///
    /// If called outside of a tokio runtime, this method will panic.
    pub fn start<C: Clock>(clock: C) -> Self {
        Self::with_period(clock, REFRESH_INTERVAL)
    }

    /// Start refreshing every `period`.
    ///
    /// # Panics
    ///
    /// If `period` is zero or this is called outside of a tokio runtime, this method
    /// will panic.
    pub fn with_period<C: Clock>(clock: C, period: Duration) -> Self {
        assert!(!period.is_zero(), "clock refresh period must be non-zero");

        let (tx, rx) = watch::channel(DisplayTime::from_datetime(&clock.now()));
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = tokio::spawn(async move {
            loop {
                let _ = interval.tick().await;
                let shown = DisplayTime::from_datetime(&clock.now());
                tracing::trace!(message = "clock refreshed", date = %shown.date, time = %shown.time);

                if tx.send(shown).is_err() {
                    break;
                }
            }
        });

        Ticker { task, rx }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayTime> {
        self.rx.clone()
    }

    pub fn current(&self) -> DisplayTime {
        self.rx.borrow().clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
