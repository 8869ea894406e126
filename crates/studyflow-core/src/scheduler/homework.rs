//! Homework placement: one session anchored shortly before the due date.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use super::{event_title, homework_description, BatchRun};
use crate::assignment::AssignmentRequest;
use crate::report::PlacementResult;

impl BatchRun<'_> {
    /// Place the single session for a homework assignment.
    ///
    /// The anchor day sits `homework_lead_days` before the due date. When
    /// its window is full the search widens outward one day at a time,
    /// earlier day first, until a slot opens or the radius is exhausted.
    /// A due date too close to the calendar's edge to carry an anchor
    /// exhausts the search immediately.
    pub(super) fn place_homework(
        &mut self,
        request: &AssignmentRequest,
        due: DateTime<FixedOffset>,
        duration: Duration,
        result: &mut PlacementResult,
    ) {
        let anchor = Duration::try_days(self.config.homework_lead_days)
            .and_then(|lead| due.checked_sub_signed(lead));

        if let Some(anchor) = anchor {
            for day in candidate_days(anchor.date_naive(), self.config.search_radius_days) {
                let window = match self.day_window(day) {
                    Some(window) => window,
                    None => continue,
                };
                if let Some(slot) =
                    self.finder
                        .find_free_slot(window.start, window.end, duration, &self.busy)
                {
                    let title = event_title(request);
                    let description = homework_description(request);
                    self.commit_session(slot, title, description, result);
                    return;
                }
            }
        }

        result.push_error(format!(
            "No free slot found within +/-{} days of preferred scheduling day.",
            self.config.search_radius_days
        ));
    }
}

/// Anchor day first, then alternating outward: -1, +1, -2, +2, ...
/// Days falling off the calendar's representable range are skipped.
fn candidate_days(anchor: NaiveDate, radius_days: i64) -> Vec<NaiveDate> {
    let mut days = vec![anchor];
    for offset in 1..=radius_days {
        let step = Duration::days(offset);
        if let Some(day) = anchor.checked_sub_signed(step) {
            days.push(day);
        }
        if let Some(day) = anchor.checked_add_signed(step) {
            days.push(day);
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    #[test]
    fn test_candidate_days_alternate_outward() {
        let days = candidate_days(day(8), 2);
        assert_eq!(days, vec![day(8), day(7), day(9), day(6), day(10)]);
    }

    #[test]
    fn test_candidate_days_cover_full_radius() {
        let days = candidate_days(day(15), 7);
        assert_eq!(days.len(), 15);
        assert_eq!(*days.last().unwrap(), day(22));
        assert_eq!(days[days.len() - 2], day(8));
    }

    #[test]
    fn test_zero_radius_keeps_only_the_anchor() {
        assert_eq!(candidate_days(day(8), 0), vec![day(8)]);
    }

    #[test]
    fn test_days_past_the_calendar_edge_are_skipped() {
        let days = candidate_days(NaiveDate::MAX, 2);
        assert_eq!(
            days,
            vec![
                NaiveDate::MAX,
                NaiveDate::MAX - Duration::days(1),
                NaiveDate::MAX - Duration::days(2),
            ]
        );
    }
}
