use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day's study assignment for one subject.
///
/// Tasks are produced entirely by the scheduler and never mutated afterwards;
/// regeneration discards the whole set and builds a new one.
///
/// Hours are kept in integer hundredths (`centihours`) so the one-time
/// two-decimal rounding the scheduler performs is exact and daily-ceiling
/// comparisons never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    subject: String,
    date: NaiveDate,
    centihours: u32,
}

impl ScheduledTask {
    #[must_use]
    pub fn new(subject: impl Into<String>, date: NaiveDate, centihours: u32) -> Self {
        Self {
            subject: subject.into(),
            date,
            centihours,
        }
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Allocated hours in integer hundredths.
    #[must_use]
    pub fn centihours(&self) -> u32 {
        self.centihours
    }

    /// Allocated hours as a decimal value (e.g. `3.0`, `1.33`).
    #[must_use]
    pub fn hours(&self) -> f64 {
        f64::from(self.centihours) / 100.0
    }

    /// The completion key that identifies this task within its schedule.
    #[must_use]
    pub fn key(&self) -> TaskKey {
        TaskKey {
            date: self.date,
            subject: self.subject.clone(),
            centihours: self.centihours,
        }
    }
}

/// Identifies one scheduled task within a generated schedule.
///
/// The key is `(date, subject, hours)`; it collides only when two tasks for
/// the same subject on the same date carry identical hour values, which a
/// single scheduling run never produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub date: NaiveDate,
    pub subject: String,
    pub centihours: u32,
}

impl TaskKey {
    #[must_use]
    pub fn new(date: NaiveDate, subject: impl Into<String>, centihours: u32) -> Self {
        Self {
            date,
            subject: subject.into(),
            centihours,
        }
    }
}
