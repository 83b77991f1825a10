#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod planner;
pub mod study_session;

pub use planner_core::Clock;

pub use dashboard::{Dashboard, DashboardSummary, DayView, TaskEntry};
pub use error::{PlannerError, SessionError};
pub use planner::{GeneratedSchedule, InvalidDateNotice, PlannerService};
pub use study_session::{BURNOUT_THRESHOLD_SECS, BurnoutWarning, StudySession};
