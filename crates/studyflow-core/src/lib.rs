//! # Studyflow Core Library
//!
//! Core business logic for Studyflow, a batch scheduler that places
//! study sessions for homework and exams into the free slots of a
//! user's calendar. The CLI crate is a thin layer over this API.
//!
//! ## Architecture
//!
//! - **Interval arithmetic**: half-open time intervals and the busy set
//!   they accumulate in during a batch
//! - **Slot search**: bounded day-window scans that step past blackouts
//!   and jump past busy stretches
//! - **Batch scheduling**: one busy fetch per batch, in-order placement,
//!   per-session commits so placements never collide
//! - **Calendar collaborators**: read/write capabilities with in-memory
//!   and Google Calendar implementations
//!
//! ## Key Components
//!
//! - [`BatchScheduler`]: entry point, schedules a batch of assignments
//! - [`SchedulerConfig`]: TOML-backed scheduling defaults
//! - [`CalendarRead`] / [`CalendarWrite`]: collaborator capabilities
//! - [`BatchReport`]: per-assignment outcomes of one batch call

pub mod assignment;
pub mod calendar;
pub mod config;
pub mod error;
pub mod interval;
pub mod report;
pub mod scheduler;
pub mod slot;

pub use assignment::{AssignmentKind, AssignmentRequest};
pub use calendar::{
    CalendarRead, CalendarWrite, EventHandle, GoogleCalendar, InMemoryCalendar, StoredEvent,
};
pub use config::{config_dir, SchedulerConfig};
pub use error::{CalendarError, ConfigError, CoreError, Result, ValidationError};
pub use interval::{BusyCalendar, TimeInterval};
pub use report::{build_report, BatchReport, BatchStatus, PlacementResult, ScheduledEvent};
pub use scheduler::BatchScheduler;
pub use slot::{find_free_slot, BlackoutWindow, SlotFinder};
