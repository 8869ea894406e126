//! Free-slot search within a bounded day window.
//!
//! Scans candidate start times forward through a working window, skipping
//! blackout sub-windows (meals) in fixed steps and jumping past busy
//! intervals in one move.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::interval::{BusyCalendar, TimeInterval};

/// A recurring daily blackout expressed as local clock hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl BlackoutWindow {
    /// Create a blackout spanning `[start_hour:00, end_hour:00)`.
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// The default meal blackouts: lunch 12:00-13:00 and dinner 18:00-19:00.
    pub fn default_meals() -> Vec<BlackoutWindow> {
        vec![BlackoutWindow::new(12, 13), BlackoutWindow::new(18, 19)]
    }

    /// Materialize this blackout on the local date of `anchor`.
    ///
    /// Returns `None` for hours that do not name a valid clock time,
    /// which drops the blackout for that day instead of failing the scan.
    pub fn on_day(&self, anchor: &DateTime<FixedOffset>) -> Option<TimeInterval> {
        let start = anchor
            .with_hour(self.start_hour)?
            .with_minute(0)?
            .with_second(0)?
            .with_nanosecond(0)?;
        let end = anchor
            .with_hour(self.end_hour)?
            .with_minute(0)?
            .with_second(0)?
            .with_nanosecond(0)?;
        TimeInterval::new(start, end).ok()
    }
}

/// Finder for the earliest free slot in a window.
pub struct SlotFinder {
    /// Step taken when a candidate collides with a blackout
    step: Duration,
    /// Daily blackout windows to scan around
    blackouts: Vec<BlackoutWindow>,
}

impl SlotFinder {
    /// Create a finder with default settings (30 min step, meal blackouts).
    pub fn new() -> Self {
        Self {
            step: Duration::minutes(30),
            blackouts: BlackoutWindow::default_meals(),
        }
    }

    /// Replace the blackout windows.
    pub fn with_blackouts(mut self, blackouts: Vec<BlackoutWindow>) -> Self {
        self.blackouts = blackouts;
        self
    }

    /// Set the scan step in minutes. Steps too large for a `Duration`
    /// are pinned to the maximum, which ends any scan at its first
    /// blackout collision.
    pub fn with_step_minutes(mut self, minutes: i64) -> Self {
        self.step = Duration::try_minutes(minutes).unwrap_or(Duration::MAX);
        self
    }

    /// Find the earliest slot of `duration` inside `[window_start, window_end]`
    /// that overlaps neither a blackout nor a busy interval.
    ///
    /// # Arguments
    /// * `window_start` - First admissible start time
    /// * `window_end` - Latest admissible end time
    /// * `duration` - Required slot length
    /// * `busy` - Existing commitments to scan around
    ///
    /// # Returns
    /// The first free slot, or `None` when nothing fits. A blackout
    /// collision advances by the scan step; a busy collision jumps straight
    /// to the end of the conflicting interval, so long busy stretches cost
    /// one iteration instead of a step-by-step crawl. Durations or steps
    /// that would push past the calendar's representable range end the
    /// scan empty-handed.
    pub fn find_free_slot(
        &self,
        window_start: DateTime<FixedOffset>,
        window_end: DateTime<FixedOffset>,
        duration: Duration,
        busy: &BusyCalendar,
    ) -> Option<TimeInterval> {
        if duration <= Duration::zero() || self.step <= Duration::zero() {
            return None;
        }

        let mut candidate = window_start;
        while let Some(end) = candidate.checked_add_signed(duration) {
            if end > window_end {
                return None;
            }
            let slot = TimeInterval::new(candidate, end).ok()?;

            // Blackouts are checked before busy intervals
            if self.hits_blackout(&slot) {
                candidate = candidate.checked_add_signed(self.step)?;
                continue;
            }

            if let Some(conflict) = busy.first_conflict(&slot) {
                candidate = conflict.end;
                continue;
            }

            return Some(slot);
        }

        None
    }

    fn hits_blackout(&self, slot: &TimeInterval) -> bool {
        self.blackouts.iter().any(|b| match b.on_day(&slot.start) {
            Some(window) => window.overlaps(slot),
            None => false,
        })
    }
}

impl Default for SlotFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to search with default settings
pub fn find_free_slot(
    window_start: DateTime<FixedOffset>,
    window_end: DateTime<FixedOffset>,
    duration: Duration,
    busy: &BusyCalendar,
) -> Option<TimeInterval> {
    SlotFinder::new().find_free_slot(window_start, window_end, duration, busy)
}
