//! Exam prep placement: several sessions spread across the days before.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use super::{event_title, exam_description, BatchRun};
use crate::assignment::AssignmentRequest;
use crate::error::ValidationError;
use crate::report::PlacementResult;

impl BatchRun<'_> {
    /// Place the prep sessions for an exam.
    ///
    /// Session days spread evenly across the span before the due date.
    /// Each day gets a single-day search only; a full day records an
    /// error and the remaining sessions still run. A span that cannot be
    /// projected back from the due date is an input error for this
    /// assignment alone.
    pub(super) fn place_exam_prep(
        &mut self,
        request: &AssignmentRequest,
        due: DateTime<FixedOffset>,
        duration: Duration,
        result: &mut PlacementResult,
    ) {
        let sessions = request.prep_sessions.unwrap_or(self.config.prep_sessions);
        let mut span = request.prep_span_days.unwrap_or(self.config.prep_span_days);
        if span <= 0 {
            span = 7;
        }
        let span_start = match Duration::try_days(span).and_then(|d| due.checked_sub_signed(d)) {
            Some(start) => start,
            None => {
                result.push_error(ValidationError::InvalidPrepSpan { days: span }.to_string());
                return;
            }
        };

        for day in session_days(span_start, span, sessions) {
            let window = match self.day_window(day) {
                Some(window) => window,
                None => {
                    result.push_error(format!("No free slot found on {day}"));
                    continue;
                }
            };
            match self
                .finder
                .find_free_slot(window.start, window.end, duration, &self.busy)
            {
                Some(slot) => {
                    let title = event_title(request);
                    let description = exam_description(request);
                    self.commit_session(slot, title, description, result);
                }
                None => result.push_error(format!("No free slot found on {day}")),
            }
        }
    }
}

/// Evenly distributed session days across the span. Offsets are rounded
/// half to even, so two sessions over five days land on days 0 and 2.
fn session_days(
    span_start: DateTime<FixedOffset>,
    span_days: i64,
    sessions: u32,
) -> Vec<NaiveDate> {
    let delta = span_days as f64 / sessions.max(1) as f64;
    (0..sessions)
        .map(|i| {
            let offset_days = (i as f64 * delta).round_ties_even() as i64;
            (span_start + Duration::days(offset_days)).date_naive()
        })
        .collect()
}
