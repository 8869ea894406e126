//! Batch report types.
//!
//! The shape callers receive back: per-assignment placement results keyed
//! by effective id, plus a top-level status that only turns to error when
//! the whole batch could not run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::traits::EventHandle;
use crate::interval::TimeInterval;

/// One study session committed to the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Effective id of the assignment this session studies for
    pub assignment_id: String,
    /// When the session takes place
    pub interval: TimeInterval,
    /// Event summary as written to the calendar
    pub title: String,
    /// Event description as written to the calendar
    pub description: String,
    /// Provider handle for the created event
    pub handle: EventHandle,
}

/// Outcome for one assignment: zero or more scheduled sessions plus any
/// errors hit along the way. Both can be non-empty at once (an exam with
/// one unplaceable session still gets the others).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementResult {
    pub assignment_id: String,
    pub scheduled: Vec<ScheduledEvent>,
    pub errors: Vec<String>,
}

impl PlacementResult {
    /// Empty result for an assignment.
    pub fn new(assignment_id: impl Into<String>) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            scheduled: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Record a committed session.
    pub fn push_scheduled(&mut self, event: ScheduledEvent) {
        self.scheduled.push(event);
    }

    /// Record an error for this assignment.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Whether anything was placed.
    pub fn has_placements(&self) -> bool {
        !self.scheduled.is_empty()
    }
}

/// Whether the batch ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// The batch ran; per-assignment outcomes are in `results`
    Ok,
    /// The batch could not run at all
    Error,
}

/// Aggregate outcome of one `schedule_batch` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    /// Batch-fatal error, present only when `status` is `error`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub results: BTreeMap<String, PlacementResult>,
}

impl BatchReport {
    /// Report for a batch that ran to completion.
    pub fn ok(results: BTreeMap<String, PlacementResult>) -> Self {
        Self {
            status: BatchStatus::Ok,
            error: None,
            results,
        }
    }

    /// Report for a batch that could not run.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: BatchStatus::Error,
            error: Some(message.into()),
            results: BTreeMap::new(),
        }
    }

    /// Every scheduled session across all assignments.
    pub fn scheduled_events(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.results.values().flat_map(|result| result.scheduled.iter())
    }

    /// Every recorded error, paired with its assignment id.
    pub fn assignment_errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().flat_map(|(id, result)| {
            result.errors.iter().map(move |e| (id.as_str(), e.as_str()))
        })
    }
}

/// Aggregate per-assignment results into the final report.
pub fn build_report(results: BTreeMap<String, PlacementResult>) -> BatchReport {
    BatchReport::ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_report_serializes_without_error_field() {
        let mut results = BTreeMap::new();
        results.insert("hw-1".to_string(), PlacementResult::new("hw-1"));
        let report = build_report(results);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json.get("error").is_none());
        assert!(json["results"]["hw-1"]["scheduled"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_failed_report_carries_top_level_error() {
        let report = BatchReport::failed("Could not fetch existing events: boom");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Could not fetch existing events: boom");
        assert!(json["results"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_report_keys_are_sorted_for_stable_output() {
        let mut results = BTreeMap::new();
        results.insert("b".to_string(), PlacementResult::new("b"));
        results.insert("a".to_string(), PlacementResult::new("a"));
        let report = build_report(results);

        let keys: Vec<&String> = report.results.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
