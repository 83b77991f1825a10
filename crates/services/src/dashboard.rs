//! Owned state for the active view: schedule, completion set, and burnout
//! session live here and nowhere else. Switching views builds a fresh
//! `Dashboard`; nothing is shared or synchronized across views.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use planner_core::Clock;
use planner_core::model::{ScheduledTask, Subject, TaskKey};
use planner_core::progress::{CompletionSet, ProgressReport, TaskFlags};
use planner_core::scheduler::SchedulePlan;

use crate::error::SessionError;
use crate::study_session::{BurnoutWarning, StudySession};

/// One task as presented for a given day, with its badge flags.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
    pub subject: String,
    pub hours: f64,
    pub exam_date: NaiveDate,
    pub done: bool,
    pub flags: TaskFlags,
    pub key: TaskKey,
}

/// The date-keyed task list for one calendar day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<TaskEntry>,
}

impl DayView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sidebar counters: subjects scheduled, study sessions planned, time studied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub subject_count: usize,
    pub task_count: usize,
    pub studied_secs: u64,
}

/// Exclusive owner of the generated schedule, the completion set, and the
/// burnout session for the active view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    clock: Clock,
    subjects: Vec<Subject>,
    plan: SchedulePlan,
    completions: CompletionSet,
    session: StudySession,
}

impl Dashboard {
    #[must_use]
    pub fn new(clock: Clock, subjects: Vec<Subject>, plan: SchedulePlan) -> Self {
        Self {
            clock,
            subjects,
            plan,
            completions: CompletionSet::new(),
            session: StudySession::new(),
        }
    }

    /// The clock's current calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn plan(&self) -> &SchedulePlan {
        &self.plan
    }

    /// Replace the schedule with a freshly generated plan.
    ///
    /// The previous task set is discarded wholesale and the completion set
    /// is reset; there is no incremental update.
    pub fn regenerate(&mut self, subjects: Vec<Subject>, plan: SchedulePlan) {
        self.subjects = subjects;
        self.plan = plan;
        self.completions.reset();
    }

    /// Flip the done flag for one task key. Other keys are unaffected and a
    /// double toggle restores the prior state.
    pub fn toggle_task(&mut self, key: TaskKey) -> bool {
        self.completions.toggle(key)
    }

    #[must_use]
    pub fn is_done(&self, key: &TaskKey) -> bool {
        self.completions.is_done(key)
    }

    /// Tasks grouped by date, for calendar rendering by any front end.
    #[must_use]
    pub fn tasks_by_date(&self) -> BTreeMap<NaiveDate, Vec<&ScheduledTask>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&ScheduledTask>> = BTreeMap::new();
        for task in &self.plan.tasks {
            by_date.entry(task.date()).or_default().push(task);
        }
        by_date
    }

    /// The task list for one day, with done/warn/missed recomputed now.
    ///
    /// Tasks whose subject is no longer in the list are omitted, matching
    /// the progress derivation.
    #[must_use]
    pub fn day_view(&self, date: NaiveDate) -> DayView {
        let exam_dates: HashMap<&str, NaiveDate> = self
            .subjects
            .iter()
            .map(|s| (s.name(), s.exam_date()))
            .collect();
        let today = self.clock.today();

        let entries = self
            .plan
            .tasks
            .iter()
            .filter(|task| task.date() == date)
            .filter_map(|task| {
                let exam_date = *exam_dates.get(task.subject())?;
                let done = self.completions.is_done(&task.key());
                Some(TaskEntry {
                    subject: task.subject().to_owned(),
                    hours: task.hours(),
                    exam_date,
                    done,
                    flags: TaskFlags::derive(task, exam_date, today, done),
                    key: task.key(),
                })
            })
            .collect();

        DayView { date, entries }
    }

    /// Snapshot of overall and per-subject completion percentages.
    #[must_use]
    pub fn progress(&self) -> ProgressReport {
        ProgressReport::compute(&self.plan.tasks, &self.subjects, &self.completions)
    }

    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            subject_count: self.subjects.len(),
            task_count: self.plan.task_count(),
            studied_secs: self.session.total_secs(self.clock.now()),
        }
    }

    // ── Burnout session ──────────────────────────────────────────────

    /// Start the study timer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` if it is already running.
    pub fn start_studying(&mut self) -> Result<(), SessionError> {
        self.session.start(self.clock.now())
    }

    /// Stop the study timer, returning the session length in seconds.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` if it is not running.
    pub fn stop_studying(&mut self) -> Result<u64, SessionError> {
        self.session.stop(self.clock.now())
    }

    #[must_use]
    pub fn is_studying(&self) -> bool {
        self.session.is_running()
    }

    #[must_use]
    pub fn studied_secs(&self) -> u64 {
        self.session.total_secs(self.clock.now())
    }

    /// Run the burnout check against the clock; call on every user action.
    pub fn burnout_check(&mut self) -> Option<BurnoutWarning> {
        self.session.check(self.clock.now())
    }

    /// Advance the injected clock; test hook, a no-op on the real clock.
    pub fn advance_clock(&mut self, delta: chrono::Duration) {
        self.clock.advance(delta);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
