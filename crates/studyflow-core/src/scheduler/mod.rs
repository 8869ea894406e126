//! Batch scheduler for study sessions.
//!
//! Places each assignment's sessions into free calendar slots:
//! - Fetches existing busy intervals once for a covering window
//! - Homework gets one session near its due date, exams get several
//!   spread across the days before
//! - Commits each placement to the busy set before the next search, so
//!   placements never collide with each other or with existing events
//! - Collects every outcome into a single batch report
//!
//! One `schedule_batch` call is the unit of atomicity: there is no
//! rollback, and a later failure never undoes earlier commits.

mod exam;
mod homework;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use tracing::{debug, warn};

use crate::assignment::{AssignmentKind, AssignmentRequest};
use crate::calendar::traits::{CalendarRead, CalendarWrite};
use crate::config::SchedulerConfig;
use crate::error::ValidationError;
use crate::interval::{BusyCalendar, TimeInterval};
use crate::report::{build_report, BatchReport, PlacementResult, ScheduledEvent};
use crate::slot::SlotFinder;

/// Batch scheduler over a pair of calendar collaborators.
pub struct BatchScheduler {
    config: SchedulerConfig,
}

impl BatchScheduler {
    /// Create a scheduler with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Schedule every assignment in input order.
    ///
    /// # Arguments
    /// * `assignments` - Requests to place, processed first to last
    /// * `reader` - Supplies existing busy intervals
    /// * `writer` - Receives the created events
    ///
    /// # Returns
    /// A report with per-assignment outcomes. Failures scoped to one
    /// assignment (bad input, no free slot, a rejected write) are recorded
    /// in its result and the batch continues; only a failed busy fetch or
    /// an unusable configuration aborts the whole batch.
    pub fn schedule_batch(
        &self,
        assignments: &[AssignmentRequest],
        reader: &dyn CalendarRead,
        writer: &dyn CalendarWrite,
    ) -> BatchReport {
        // 1. Validate the config up front; `with_config` accepts the
        //    struct unchecked, so out-of-range values must surface here
        let offset = match self.config.validate().and_then(|_| self.config.offset()) {
            Ok(offset) => offset,
            Err(e) => {
                warn!(error = %e, "unusable scheduler configuration");
                return BatchReport::failed(e.to_string());
            }
        };

        // 2. Covering window over every parseable due date
        let (time_min, time_max) = self.covering_window(assignments, offset);
        debug!(%time_min, %time_max, count = assignments.len(), "scheduling batch");

        // 3. One busy fetch for the whole batch; failure is batch-fatal
        let busy_intervals = match reader.list_busy_intervals(time_min, time_max) {
            Ok(intervals) => intervals,
            Err(e) => {
                warn!(error = %e, "busy fetch failed, aborting batch");
                return BatchReport::failed(format!("Could not fetch existing events: {e}"));
            }
        };

        let mut run = BatchRun {
            config: &self.config,
            offset,
            finder: SlotFinder::new()
                .with_step_minutes(self.config.scan_step_minutes)
                .with_blackouts(self.config.blackouts.clone()),
            busy: BusyCalendar::from_intervals(busy_intervals),
            writer,
        };

        // 4. Place in input order; earlier assignments claim contested slots
        let mut results = BTreeMap::new();
        for request in assignments {
            let result = run.schedule_one(request);
            debug!(
                assignment = %result.assignment_id,
                scheduled = result.scheduled.len(),
                errors = result.errors.len(),
                "assignment processed"
            );
            results.insert(request.effective_id(), result);
        }

        build_report(results)
    }

    /// Busy-fetch window covering every parseable due date, widened by the
    /// configured lookback and lookahead. Falls back to a window starting
    /// now when nothing parses. A widening that would leave the calendar's
    /// representable range is skipped; the window still covers the dues.
    fn covering_window(
        &self,
        assignments: &[AssignmentRequest],
        offset: FixedOffset,
    ) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        let dues: Vec<DateTime<FixedOffset>> = assignments
            .iter()
            .filter_map(|a| a.parse_due_date(offset).ok())
            .collect();

        match (dues.iter().min(), dues.iter().max()) {
            (Some(&earliest), Some(&latest)) => (
                Duration::try_days(self.config.lookback_days)
                    .and_then(|d| earliest.checked_sub_signed(d))
                    .unwrap_or(earliest),
                Duration::try_days(self.config.lookahead_days)
                    .and_then(|d| latest.checked_add_signed(d))
                    .unwrap_or(latest),
            ),
            _ => {
                let now = Utc::now().with_timezone(&offset);
                let horizon = Duration::try_days(self.config.lookback_days)
                    .and_then(|d| now.checked_add_signed(d))
                    .unwrap_or(now);
                (now, horizon)
            }
        }
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// State threaded through one batch call.
struct BatchRun<'a> {
    config: &'a SchedulerConfig,
    offset: FixedOffset,
    finder: SlotFinder,
    busy: BusyCalendar,
    writer: &'a dyn CalendarWrite,
}

impl BatchRun<'_> {
    /// Validate one request and dispatch on its kind.
    fn schedule_one(&mut self, request: &AssignmentRequest) -> PlacementResult {
        let mut result = PlacementResult::new(request.effective_id());

        if request.title.trim().is_empty() {
            result.push_error(ValidationError::MissingTitle.to_string());
            return result;
        }

        let due = match request.parse_due_date(self.offset) {
            Ok(due) => due,
            Err(e) => {
                result.push_error(e.to_string());
                return result;
            }
        };

        let duration = match request.estimated_duration(self.config.session_hours) {
            Ok(duration) => duration,
            Err(e) => {
                result.push_error(e.to_string());
                return result;
            }
        };

        match request.kind {
            AssignmentKind::Homework => self.place_homework(request, due, duration, &mut result),
            AssignmentKind::Exam => self.place_exam_prep(request, due, duration, &mut result),
        }

        result
    }

    /// Working window for a local calendar day.
    fn day_window(&self, day: NaiveDate) -> Option<TimeInterval> {
        let start = self
            .offset
            .from_local_datetime(&day.and_hms_opt(self.config.day_start_hour, 0, 0)?)
            .single()?;
        let end = self
            .offset
            .from_local_datetime(&day.and_hms_opt(self.config.day_end_hour, 0, 0)?)
            .single()?;
        TimeInterval::new(start, end).ok()
    }

    /// Write one session to the calendar. The interval joins the busy set
    /// only after the write succeeds; a rejected write leaves the slot
    /// reusable and records the error.
    fn commit_session(
        &mut self,
        slot: TimeInterval,
        title: String,
        description: String,
        result: &mut PlacementResult,
    ) {
        match self.writer.create_event(&slot, &title, &description) {
            Ok(handle) => {
                self.busy.commit(slot.clone());
                result.push_scheduled(ScheduledEvent {
                    assignment_id: result.assignment_id.clone(),
                    interval: slot,
                    title,
                    description,
                    handle,
                });
            }
            Err(e) => {
                warn!(error = %e, assignment = %result.assignment_id, "event write failed");
                result.push_error(e.to_string());
            }
        }
    }
}

/// Event summary for a study session.
fn event_title(request: &AssignmentRequest) -> String {
    format!("Study: {}", request.title)
}

/// Homework event body: study line, resource folder, materials.
fn homework_description(request: &AssignmentRequest) -> String {
    describe(format!("Study: {}", request.title), request)
}

/// Exam prep event body.
fn exam_description(request: &AssignmentRequest) -> String {
    describe(format!("Study Session for {}", request.title), request)
}

fn describe(lead: String, request: &AssignmentRequest) -> String {
    let folder = request.folder_link.as_deref().unwrap_or("[FOLDER_LINK]");
    let materials =
        serde_json::to_string(&request.materials).unwrap_or_else(|_| "[]".to_string());
    format!("{lead}\nResource Folder: {folder}\nMaterials: {materials}")
}
