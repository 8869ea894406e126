//! Schedule subcommand: place study sessions for a batch of assignments.
//!
//! Assignments come from a JSON file. Without a Google token the batch
//! runs against an in-memory calendar seeded from an optional busy file,
//! which is useful for previewing placements.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use studyflow_core::{
    AssignmentRequest, BatchScheduler, BatchStatus, GoogleCalendar, InMemoryCalendar,
    SchedulerConfig, TimeInterval,
};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Schedule sessions for assignments from a JSON file
    Run {
        /// Path to a JSON array of assignments
        #[arg(long)]
        file: PathBuf,
        /// Path to a JSON array of busy intervals for the in-memory calendar
        #[arg(long)]
        busy_file: Option<PathBuf>,
        /// OAuth access token; schedules against Google Calendar instead
        #[arg(long)]
        google_token: Option<String>,
        /// Calendar id to schedule into (defaults to "primary")
        #[arg(long)]
        calendar_id: Option<String>,
    },
    /// Validate an assignments file without scheduling anything
    Check {
        /// Path to a JSON array of assignments
        #[arg(long)]
        file: PathBuf,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Run {
            file,
            busy_file,
            google_token,
            calendar_id,
        } => run_batch(&file, busy_file.as_deref(), google_token, calendar_id),
        ScheduleAction::Check { file } => check_file(&file),
    }
}

fn load_assignments(path: &Path) -> Result<Vec<AssignmentRequest>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let assignments: Vec<AssignmentRequest> = serde_json::from_str(&content)?;
    Ok(assignments)
}

fn run_batch(
    file: &Path,
    busy_file: Option<&Path>,
    google_token: Option<String>,
    calendar_id: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let assignments = load_assignments(file)?;
    let config = SchedulerConfig::load_or_default();
    let scheduler = BatchScheduler::with_config(config.clone());

    let report = match google_token {
        Some(token) => {
            let mut calendar = GoogleCalendar::new(token).with_offset(config.offset()?);
            if let Some(id) = calendar_id {
                calendar = calendar.with_calendar_id(id);
            }
            // The calendar client blocks on an ambient runtime
            let runtime = tokio::runtime::Runtime::new()?;
            let _guard = runtime.enter();
            scheduler.schedule_batch(&assignments, &calendar, &calendar)
        }
        None => {
            let busy = match busy_file {
                Some(path) => {
                    let content = std::fs::read_to_string(path)?;
                    serde_json::from_str::<Vec<TimeInterval>>(&content)?
                }
                None => Vec::new(),
            };
            let calendar = InMemoryCalendar::with_busy(busy);
            scheduler.schedule_batch(&assignments, &calendar, &calendar)
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.status == BatchStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}

fn check_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let assignments = load_assignments(file)?;
    let config = SchedulerConfig::load_or_default();
    let offset = config.offset()?;

    let mut ok = true;
    for request in &assignments {
        match request.validate(offset, config.session_hours) {
            Ok(()) => println!("{}: ok", request.effective_id()),
            Err(e) => {
                ok = false;
                println!("{}: {e}", request.effective_id());
            }
        }
    }

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
