//! In-memory calendar collaborator.
//!
//! Backs the file-driven CLI mode and most tests. Seeded busy intervals
//! and created events share one store; reads return both, ordered by
//! start time.

use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};

use crate::calendar::traits::{CalendarRead, CalendarWrite, EventHandle};
use crate::error::CalendarError;
use crate::interval::TimeInterval;

/// An event held by [`InMemoryCalendar`].
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub interval: TimeInterval,
}

/// Calendar collaborator backed by a plain in-memory list.
pub struct InMemoryCalendar {
    events: Mutex<Vec<StoredEvent>>,
}

impl InMemoryCalendar {
    /// Create an empty calendar.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Create a calendar pre-seeded with busy intervals.
    pub fn with_busy(intervals: Vec<TimeInterval>) -> Self {
        let events = intervals
            .into_iter()
            .map(|interval| StoredEvent {
                id: uuid::Uuid::new_v4().to_string(),
                title: "(busy)".to_string(),
                description: String::new(),
                interval,
            })
            .collect();
        Self {
            events: Mutex::new(events),
        }
    }

    /// Snapshot of every stored event, in insertion order.
    pub fn events(&self) -> Vec<StoredEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarRead for InMemoryCalendar {
    fn list_busy_intervals(
        &self,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeInterval>, CalendarError> {
        let guard = self.events.lock().map_err(|_| CalendarError::StorePoisoned)?;
        let mut intervals: Vec<TimeInterval> = guard
            .iter()
            .map(|event| &event.interval)
            .filter(|interval| interval.start < time_max && time_min < interval.end)
            .cloned()
            .collect();
        intervals.sort_by_key(|interval| interval.start);
        Ok(intervals)
    }
}

impl CalendarWrite for InMemoryCalendar {
    fn create_event(
        &self,
        interval: &TimeInterval,
        title: &str,
        description: &str,
    ) -> Result<EventHandle, CalendarError> {
        let mut guard = self.events.lock().map_err(|_| CalendarError::StorePoisoned)?;
        let id = uuid::Uuid::new_v4().to_string();
        guard.push(StoredEvent {
            id: id.clone(),
            title: title.to_string(),
            description: description.to_string(),
            interval: interval.clone(),
        });
        Ok(EventHandle {
            id,
            html_link: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 9, day, hour, 0, 0)
            .unwrap()
    }

    fn interval(day: u32, sh: u32, eh: u32) -> TimeInterval {
        TimeInterval::new(at(day, sh), at(day, eh)).unwrap()
    }

    #[test]
    fn test_list_filters_to_window_and_sorts() {
        let calendar = InMemoryCalendar::with_busy(vec![
            interval(12, 9, 10),
            interval(8, 14, 15),
            interval(8, 9, 10),
        ]);

        let listed = calendar.list_busy_intervals(at(8, 0), at(9, 0)).unwrap();
        assert_eq!(listed, vec![interval(8, 9, 10), interval(8, 14, 15)]);
    }

    #[test]
    fn test_created_events_become_busy() {
        let calendar = InMemoryCalendar::new();
        let slot = interval(8, 9, 11);
        let handle = calendar
            .create_event(&slot, "Study: Essay", "Study: Essay\n")
            .unwrap();
        assert!(!handle.id.is_empty());

        let listed = calendar.list_busy_intervals(at(8, 0), at(9, 0)).unwrap();
        assert_eq!(listed, vec![slot]);

        let events = calendar.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Study: Essay");
    }

    #[test]
    fn test_window_boundaries_are_half_open() {
        let calendar = InMemoryCalendar::with_busy(vec![interval(8, 9, 10)]);

        // Window ending exactly at the event start does not include it
        let listed = calendar.list_busy_intervals(at(7, 0), at(8, 9)).unwrap();
        assert!(listed.is_empty());

        let listed = calendar.list_busy_intervals(at(8, 10), at(9, 0)).unwrap();
        assert!(listed.is_empty());
    }
}
