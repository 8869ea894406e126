use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::interval::TimeInterval;

/// Handle to an event created on a calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHandle {
    /// Provider-assigned event id
    pub id: String,
    /// Link to the event in the provider's UI, when one exists
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub html_link: Option<String>,
}

/// Read capability of a calendar collaborator.
///
/// The scheduler treats this as a synchronous remote call that may fail;
/// implementations return intervals ordered by start time.
pub trait CalendarRead: Send + Sync {
    /// List busy intervals overlapping `[time_min, time_max]`.
    fn list_busy_intervals(
        &self,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeInterval>, CalendarError>;
}

/// Write capability of a calendar collaborator.
pub trait CalendarWrite: Send + Sync {
    /// Create an event covering `interval` and return its handle.
    fn create_event(
        &self,
        interval: &TimeInterval,
        title: &str,
        description: &str,
    ) -> Result<EventHandle, CalendarError>;
}
