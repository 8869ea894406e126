//! Assignment requests and due-date interpretation.
//!
//! Requests are constructed per batch call and consumed once; nothing in
//! this module persists. Due dates arrive as ISO 8601 strings and are
//! resolved against the configured user offset here, at the boundary.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What kind of study work an assignment needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    /// Single study session shortly before the due date
    Homework,
    /// Several prep sessions spread across the days before the exam
    Exam,
}

impl Default for AssignmentKind {
    fn default() -> Self {
        AssignmentKind::Homework
    }
}

/// A single assignment or exam to place on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Caller-supplied identifier; reports fall back to the title
    #[serde(default)]
    pub id: Option<String>,
    /// Display title, also used in event summaries
    pub title: String,
    /// Due timestamp as an ISO 8601 string
    pub due_date: String,
    /// Homework (one session) or exam (several prep sessions).
    /// Accepts `type` as a field alias for older payloads.
    #[serde(default, alias = "type")]
    pub kind: AssignmentKind,
    /// Study time needed in hours; configured default when absent
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Resource folder link, included in event descriptions
    #[serde(default)]
    pub folder_link: Option<String>,
    /// Materials referenced in event descriptions
    #[serde(default)]
    pub materials: Vec<String>,
    /// Number of prep sessions (exams only); configured default when absent
    #[serde(default)]
    pub prep_sessions: Option<u32>,
    /// Days before the due date to spread prep over (exams only)
    #[serde(default)]
    pub prep_span_days: Option<i64>,
}

impl AssignmentRequest {
    /// Create a homework request with default scheduling parameters.
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            due_date: due_date.into(),
            kind: AssignmentKind::Homework,
            estimated_hours: None,
            folder_link: None,
            materials: Vec::new(),
            prep_sessions: None,
            prep_span_days: None,
        }
    }

    /// Set the identifier used to key this assignment in reports.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the assignment kind.
    pub fn with_kind(mut self, kind: AssignmentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the estimated study time in hours.
    pub fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Set the resource folder link.
    pub fn with_folder_link(mut self, link: impl Into<String>) -> Self {
        self.folder_link = Some(link.into());
        self
    }

    /// Set the referenced materials.
    pub fn with_materials(mut self, materials: Vec<String>) -> Self {
        self.materials = materials;
        self
    }

    /// Set the exam prep shape: session count and span in days.
    pub fn with_prep(mut self, sessions: u32, span_days: i64) -> Self {
        self.prep_sessions = Some(sessions);
        self.prep_span_days = Some(span_days);
        self
    }

    /// Identifier that keys this assignment in reports: the id when present
    /// and non-empty, otherwise the title.
    pub fn effective_id(&self) -> String {
        match &self.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => self.title.clone(),
        }
    }

    /// Parse the due date against the user's offset.
    ///
    /// Accepts RFC 3339 strings (converted to the configured offset as the
    /// same instant), naive datetimes with `T` or space separators (offset
    /// attached), and bare dates (local midnight).
    pub fn parse_due_date(
        &self,
        offset: FixedOffset,
    ) -> Result<DateTime<FixedOffset>, ValidationError> {
        parse_iso_datetime(&self.due_date, offset).ok_or_else(|| ValidationError::InvalidDueDate {
            value: self.due_date.clone(),
        })
    }

    /// Required session length, falling back to the configured default.
    /// Hours large enough to overflow a `Duration` are rejected like any
    /// other unusable value.
    pub fn estimated_duration(&self, default_hours: f64) -> Result<Duration, ValidationError> {
        let hours = self.estimated_hours.unwrap_or(default_hours);
        if !hours.is_finite() || hours <= 0.0 {
            return Err(ValidationError::InvalidDuration { hours });
        }
        Duration::try_minutes((hours * 60.0).round() as i64)
            .ok_or(ValidationError::InvalidDuration { hours })
    }

    /// Validate everything that would make placement impossible.
    pub fn validate(&self, offset: FixedOffset, default_hours: f64) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        self.parse_due_date(offset)?;
        self.estimated_duration(default_hours)?;
        Ok(())
    }
}

fn parse_iso_datetime(value: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&offset));
    }

    // Naive forms get the configured offset attached
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return offset.from_local_datetime(&naive).single();
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    offset.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}
