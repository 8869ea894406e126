//! Time intervals and the busy calendar they accumulate in.
//!
//! All timestamps are timezone-aware (`DateTime<FixedOffset>`); the
//! configured user offset is attached at the boundary and never
//! re-normalized inside the scheduling algorithm.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open span of time: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeInterval {
    /// Create an interval, rejecting `end <= start`.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Duration covered by the interval.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test. Touching endpoints do not overlap, so a
    /// session ending at 11:00 coexists with one starting at 11:00.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Busy intervals in the order the read collaborator supplied them,
/// with placements appended as they are committed.
///
/// Conflict checks scan in list order; the first match wins. Fetched
/// events arrive ordered by start time, committed placements follow.
#[derive(Debug, Clone, Default)]
pub struct BusyCalendar {
    intervals: Vec<TimeInterval>,
}

impl BusyCalendar {
    /// Create an empty busy calendar.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Build from intervals already ordered by the read collaborator.
    pub fn from_intervals(intervals: Vec<TimeInterval>) -> Self {
        Self { intervals }
    }

    /// Append a committed placement.
    pub fn commit(&mut self, interval: TimeInterval) {
        self.intervals.push(interval);
    }

    /// First stored interval (list order) that overlaps the candidate.
    pub fn first_conflict(&self, candidate: &TimeInterval) -> Option<&TimeInterval> {
        self.intervals.iter().find(|busy| busy.overlaps(candidate))
    }

    /// Whether any stored interval overlaps the candidate.
    pub fn conflicts_with(&self, candidate: &TimeInterval) -> bool {
        self.first_conflict(candidate).is_some()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate stored intervals in order.
    pub fn iter(&self) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter()
    }
}
