//! Google Calendar collaborator.
//!
//! Talks to the Calendar v3 REST API with a caller-supplied bearer token;
//! obtaining and refreshing that token is the caller's concern. Methods
//! are synchronous and bridge to the async HTTP client through the ambient
//! tokio runtime, so callers run inside (or entered into) a multi-thread
//! runtime.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::calendar::traits::{CalendarRead, CalendarWrite, EventHandle};
use crate::error::CalendarError;
use crate::interval::TimeInterval;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Google Calendar v3 client bound to one calendar.
pub struct GoogleCalendar {
    access_token: String,
    calendar_id: String,
    base_url: String,
    /// Offset all-day event dates resolve against
    offset: FixedOffset,
}

impl GoogleCalendar {
    /// Create a client for the user's primary calendar.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            calendar_id: "primary".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            offset: Utc.fix(),
        }
    }

    /// Point at a specific calendar instead of `primary`.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Resolve all-day event dates against this offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, CalendarError> {
        let resp = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .get(url)
                .query(query)
                .bearer_auth(&self.access_token)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        })?;
        Ok(resp)
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CalendarError> {
        let resp = tokio::runtime::Handle::current().block_on(async {
            Client::new()
                .post(url)
                .bearer_auth(&self.access_token)
                .json(body)
                .send()
                .await?
                .json::<serde_json::Value>()
                .await
        })?;
        Ok(resp)
    }

    /// Busy interval of one event item, or `None` when the event carries no
    /// usable times. All-day events (`date` instead of `dateTime`) land at
    /// local midnight in the configured offset.
    fn event_interval(&self, item: &serde_json::Value) -> Option<TimeInterval> {
        let start = self.event_time(&item["start"])?;
        let end = self.event_time(&item["end"])?;
        TimeInterval::new(start, end).ok()
    }

    fn event_time(&self, field: &serde_json::Value) -> Option<DateTime<FixedOffset>> {
        if let Some(stamp) = field["dateTime"].as_str() {
            return DateTime::parse_from_rfc3339(stamp)
                .ok()
                .map(|dt| dt.with_timezone(&self.offset));
        }
        let date = field["date"].as_str()?;
        let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?;
        self.offset.from_local_datetime(&naive).single()
    }
}

impl CalendarRead for GoogleCalendar {
    fn list_busy_intervals(
        &self,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeInterval>, CalendarError> {
        let query = [
            ("timeMin", time_min.to_rfc3339()),
            ("timeMax", time_max.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", "2500".to_string()),
        ];
        let resp = self.get_json(&self.events_url(), &query)?;

        if let Some(err) = resp.get("error") {
            return Err(CalendarError::Api {
                message: err.to_string(),
            });
        }

        let items = resp["items"].as_array().ok_or_else(|| {
            CalendarError::MalformedResponse("missing items in response".to_string())
        })?;

        let mut intervals = Vec::new();
        for item in items {
            match self.event_interval(item) {
                Some(interval) => intervals.push(interval),
                // Events without usable times never block a slot
                None => debug!(event = %item["id"], "skipping event without usable times"),
            }
        }
        Ok(intervals)
    }
}

impl CalendarWrite for GoogleCalendar {
    fn create_event(
        &self,
        interval: &TimeInterval,
        title: &str,
        description: &str,
    ) -> Result<EventHandle, CalendarError> {
        let body = json!({
            "summary": title,
            "description": description,
            "start": { "dateTime": interval.start.to_rfc3339() },
            "end": { "dateTime": interval.end.to_rfc3339() },
        });
        let resp = self.post_json(&self.events_url(), &body)?;

        if let Some(err) = resp.get("error") {
            return Err(CalendarError::Api {
                message: err.to_string(),
            });
        }

        let id = resp["id"]
            .as_str()
            .ok_or_else(|| {
                CalendarError::MalformedResponse("missing event id in response".to_string())
            })?
            .to_string();
        let html_link = resp["htmlLink"].as_str().map(|s| s.to_string());

        Ok(EventHandle { id, html_link })
    }
}
