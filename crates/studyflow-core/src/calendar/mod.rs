//! Calendar collaborators.
//!
//! The scheduler only knows the two capabilities in [`traits`]; everything
//! provider-specific lives behind them. `memory` backs tests and the
//! file-driven CLI mode, `google` talks to the Calendar v3 REST API.

pub mod google;
pub mod memory;
pub mod traits;

pub use google::GoogleCalendar;
pub use memory::{InMemoryCalendar, StoredEvent};
pub use traits::{CalendarRead, CalendarWrite, EventHandle};
