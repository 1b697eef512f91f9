use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use crate::{config::MAX_REFRESH_INTERVAL_SECS, updater::WeatherUpdater};

const MIN_INTERVAL: Duration = Duration::from_secs(1);
const MAX_INTERVAL: Duration = Duration::from_secs(MAX_REFRESH_INTERVAL_SECS);

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    PageLoad,
    Interval,
    VisibilityRegained,
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Turns raw visibility changes into [`Trigger::VisibilityRegained`], which
/// fires only on a hidden to visible transition.
#[derive(Debug)]
pub struct VisibilityTracker {
    current: Visibility,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self {
            current: Visibility::Visible,
        }
    }
}

impl VisibilityTracker {
    pub fn update(&mut self, next: Visibility) -> Option<Trigger> {
        let prev = std::mem::replace(&mut self.current, next);
        (prev == Visibility::Hidden && next == Visibility::Visible)
            .then_some(Trigger::VisibilityRegained)
    }
}

/// Drives refreshes from page load, a fixed timer and external triggers.
#[derive(Debug)]
pub struct Scheduler {
    updater: WeatherUpdater,
    interval: Duration,
}

impl Scheduler {
    /// `interval` is clamped to between one second and one day.
    pub fn new(updater: WeatherUpdater, interval: Duration) -> Self {
        let clamped = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        if clamped != interval {
            tracing::warn!(
                requested = ?interval,
                using = ?clamped,
                "refresh interval out of range, clamping"
            );
        }
        Self {
            updater,
            interval: clamped,
        }
    }

    /// Fire a page-load refresh, then keep firing until `triggers` closes.
    ///
    /// Each trigger spawns its own refresh; in-flight ones are neither awaited
    /// nor cancelled. Returns how many refreshes were started.
    pub async fn run(self, mut triggers: mpsc::Receiver<Trigger>) -> usize {
        let mut fired = 0;
        self.fire(Trigger::PageLoad);
        fired += 1;

        let first = Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(first, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                _ = ticker.tick() => Trigger::Interval,
                received = triggers.recv() => match received {
                    Some(trigger) => trigger,
                    None => break,
                },
            };
            self.fire(trigger);
            fired += 1;
        }

        tracing::debug!(fired, "trigger channel closed, scheduler stopping");
        fired
    }

    /// Start one detached refresh.
    pub fn fire(&self, trigger: Trigger) {
        tracing::debug!(?trigger, "refreshing weather");
        let updater = self.updater.clone();
        tokio::spawn(async move { updater.refresh_weather().await });
    }
}
