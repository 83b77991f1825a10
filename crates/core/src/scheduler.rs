use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::model::{HourBudget, ScheduledTask, Subject, SubjectId};

/// Maximum total study hours schedulable on one calendar date, across all
/// subjects, in centihours (8 hours).
pub const DAILY_CAP_CENTIHOURS: u32 = 800;

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// A subject the scheduler refused because its exam is today or already past.
///
/// Rejections are reported to the caller so it can raise the per-subject
/// invalid-date warning; they never abort the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSubject {
    pub id: SubjectId,
    pub name: String,
    pub exam_date: NaiveDate,
}

/// The output of one scheduling run: the full ordered task list plus the
/// subjects that were rejected for invalid exam dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchedulePlan {
    pub tasks: Vec<ScheduledTask>,
    pub rejected: Vec<RejectedSubject>,
}

impl SchedulePlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// Distributes each subject's revision-hour budget evenly across the days
/// remaining before its exam, under a shared daily ceiling.
///
/// The algorithm is a single greedy pass in subject-input order:
///
/// 1. `days = exam_date - today`; subjects with `days <= 0` are rejected.
/// 2. The per-day allocation is `budget / days`, rounded once to two
///    decimals.
/// 3. Each day from `today` up to (not including) the exam receives one task,
///    unless adding it would push that date's running total above the 8-hour
///    ceiling — then the subject simply gets no task that day.
///
/// Known limitation, preserved on purpose: hours lost to the ceiling are
/// dropped, not carried forward to a later day.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    budget: HourBudget,
    daily_cap_centihours: u32,
}

impl Scheduler {
    /// Creates a scheduler with the standard hour budget and the 8-hour cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            budget: HourBudget::standard(),
            daily_cap_centihours: DAILY_CAP_CENTIHOURS,
        }
    }

    /// Replaces the difficulty-to-hours mapping.
    #[must_use]
    pub fn with_budget(mut self, budget: HourBudget) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn budget(&self) -> HourBudget {
        self.budget
    }

    /// Generates the task list for `subjects` as seen from `today`.
    ///
    /// Tasks come out in subject-input order, chronologically within each
    /// subject; the sequence is stable for a given input.
    #[must_use]
    pub fn generate(&self, subjects: &[Subject], today: NaiveDate) -> SchedulePlan {
        let mut totals: HashMap<NaiveDate, u32> = HashMap::new();
        let mut plan = SchedulePlan::default();

        for subject in subjects {
            let days = (subject.exam_date() - today).num_days();
            if days <= 0 {
                plan.rejected.push(RejectedSubject {
                    id: subject.id(),
                    name: subject.name().to_owned(),
                    exam_date: subject.exam_date(),
                });
                continue;
            }

            let per_day = self.centihours_per_day(subject, days);
            for offset in 0..days {
                let date = today + Duration::days(offset);
                let total = totals.entry(date).or_insert(0);
                if *total + per_day > self.daily_cap_centihours {
                    // Over the ceiling: this subject loses the day.
                    continue;
                }
                *total += per_day;
                plan.tasks
                    .push(ScheduledTask::new(subject.name(), date, per_day));
            }
        }

        plan
    }

    /// Per-day allocation in centihours, rounded exactly once.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn centihours_per_day(&self, subject: &Subject, days: i64) -> u32 {
        let hours = self.budget.hours_for(subject.difficulty());
        (hours * 100.0 / days as f64).round() as u32
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
