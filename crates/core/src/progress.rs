//! Pure progress derivations over immutable snapshots of
//! `(tasks, completion set, subjects)`.
//!
//! Nothing here is stored: percentages and badge flags are recomputed on
//! every query so they can never go stale.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::model::{ScheduledTask, Subject, TaskKey};

//
// ─── COMPLETION SET ────────────────────────────────────────────────────────────
//

/// Tracks which scheduled tasks the user has marked done.
///
/// Reset to empty whenever a new schedule is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    done: HashMap<TaskKey, bool>,
}

impl CompletionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the done flag for `key` and returns the new state.
    ///
    /// Toggling twice restores the prior state; other keys are unaffected.
    pub fn toggle(&mut self, key: TaskKey) -> bool {
        let flag = self.done.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    #[must_use]
    pub fn is_done(&self, key: &TaskKey) -> bool {
        self.done.get(key).copied().unwrap_or(false)
    }

    /// Discards all completion state.
    pub fn reset(&mut self) {
        self.done.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.done.values().any(|&done| done)
    }
}

//
// ─── VALID TASKS ───────────────────────────────────────────────────────────────
//

/// Tasks that count toward progress: those whose date is strictly before
/// their subject's exam date. Tasks on the exam day itself, or for a subject
/// no longer in the list, are excluded.
#[must_use]
pub fn valid_tasks<'a>(
    tasks: &'a [ScheduledTask],
    subjects: &[Subject],
) -> Vec<&'a ScheduledTask> {
    let exam_dates = exam_dates_by_name(subjects);
    tasks
        .iter()
        .filter(|task| {
            exam_dates
                .get(task.subject())
                .is_some_and(|&exam| task.date() < exam)
        })
        .collect()
}

fn exam_dates_by_name<'a>(subjects: &'a [Subject]) -> HashMap<&'a str, NaiveDate> {
    subjects
        .iter()
        .map(|s| (s.name(), s.exam_date()))
        .collect()
}

//
// ─── PROGRESS REPORT ───────────────────────────────────────────────────────────
//

/// Completion percentages for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectProgress {
    pub name: String,
    pub done: usize,
    pub total: usize,
    pub percent: u8,
}

/// Aggregate completion percentages, overall and per subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub overall_percent: u8,
    pub done: usize,
    pub total: usize,
    pub per_subject: Vec<SubjectProgress>,
}

impl ProgressReport {
    /// Computes the report from a snapshot of the schedule and completions.
    ///
    /// Percentages are `round(100 * done / total)` and defined as 0 when no
    /// valid tasks exist. Per-subject entries come out in subject-input
    /// order.
    #[must_use]
    pub fn compute(
        tasks: &[ScheduledTask],
        subjects: &[Subject],
        completions: &CompletionSet,
    ) -> Self {
        let valid = valid_tasks(tasks, subjects);
        let done = valid
            .iter()
            .filter(|task| completions.is_done(&task.key()))
            .count();

        let per_subject = subjects
            .iter()
            .map(|subject| {
                let total = valid
                    .iter()
                    .filter(|task| task.subject() == subject.name())
                    .count();
                let done = valid
                    .iter()
                    .filter(|task| {
                        task.subject() == subject.name() && completions.is_done(&task.key())
                    })
                    .count();
                SubjectProgress {
                    name: subject.name().to_owned(),
                    done,
                    total,
                    percent: percent(done, total),
                }
            })
            .collect();

        Self {
            overall_percent: percent(done, valid.len()),
            done,
            total: valid.len(),
            per_subject,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * done as f64 / total as f64).round() as u8
}

//
// ─── BADGE FLAGS ───────────────────────────────────────────────────────────────
//

/// Presentation flags for one task, recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFlags {
    /// The task falls on the day before its subject's exam.
    pub warn: bool,
    /// The task's date has passed and it was never completed.
    pub missed: bool,
}

impl TaskFlags {
    #[must_use]
    pub fn derive(task: &ScheduledTask, exam_date: NaiveDate, today: NaiveDate, done: bool) -> Self {
        Self {
            warn: task.date() == exam_date - Duration::days(1),
            missed: task.date() < today && !done,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, SubjectId};
    use crate::scheduler::Scheduler;
    use crate::time::fixed_today;

    fn subject(id: u64, name: &str, days_until_exam: i64) -> Subject {
        Subject::new(
            SubjectId::new(id),
            name,
            fixed_today() + Duration::days(days_until_exam),
            Difficulty::Medium,
        )
        .unwrap()
    }

    fn generate(subjects: &[Subject]) -> Vec<ScheduledTask> {
        Scheduler::new().generate(subjects, fixed_today()).tasks
    }

    #[test]
    fn double_toggle_restores_prior_state() {
        let subjects = [subject(1, "Math", 2)];
        let tasks = generate(&subjects);
        let mut completions = CompletionSet::new();
        let key = tasks[0].key();

        assert!(!completions.is_done(&key));
        assert!(completions.toggle(key.clone()));
        assert!(completions.is_done(&key));
        assert!(!completions.toggle(key.clone()));
        assert!(!completions.is_done(&key));
        assert!(completions.is_empty());
    }

    #[test]
    fn toggle_leaves_other_keys_alone() {
        let subjects = [subject(1, "Math", 3)];
        let tasks = generate(&subjects);
        let mut completions = CompletionSet::new();

        completions.toggle(tasks[0].key());
        assert!(completions.is_done(&tasks[0].key()));
        assert!(!completions.is_done(&tasks[1].key()));
        assert!(!completions.is_done(&tasks[2].key()));
    }

    #[test]
    fn overall_percent_is_zero_without_valid_tasks() {
        let report = ProgressReport::compute(&[], &[], &CompletionSet::new());
        assert_eq!(report.overall_percent, 0);
        assert_eq!(report.total, 0);
    }

    #[test]
    fn overall_percent_counts_only_valid_tasks() {
        let subjects = [subject(1, "Math", 2), subject(2, "Bio", 2)];
        let tasks = generate(&subjects);
        assert_eq!(tasks.len(), 4);

        let mut completions = CompletionSet::new();
        completions.toggle(tasks[0].key());

        let report = ProgressReport::compute(&tasks, &subjects, &completions);
        assert_eq!(report.total, 4);
        assert_eq!(report.done, 1);
        assert_eq!(report.overall_percent, 25);
    }

    #[test]
    fn per_subject_percentages_are_independent() {
        let subjects = [subject(1, "Math", 2), subject(2, "Bio", 2)];
        let tasks = generate(&subjects);

        let mut completions = CompletionSet::new();
        for task in tasks.iter().filter(|t| t.subject() == "Math") {
            completions.toggle(task.key());
        }

        let report = ProgressReport::compute(&tasks, &subjects, &completions);
        assert_eq!(report.per_subject.len(), 2);
        assert_eq!(report.per_subject[0].name, "Math");
        assert_eq!(report.per_subject[0].percent, 100);
        assert_eq!(report.per_subject[1].name, "Bio");
        assert_eq!(report.per_subject[1].percent, 0);
        assert_eq!(report.overall_percent, 50);
    }

    #[test]
    fn percent_stays_within_bounds() {
        let subjects = [subject(1, "Math", 5)];
        let tasks = generate(&subjects);
        let mut completions = CompletionSet::new();

        for task in &tasks {
            let report = ProgressReport::compute(&tasks, &subjects, &completions);
            assert!(report.overall_percent <= 100);
            completions.toggle(task.key());
        }
        let report = ProgressReport::compute(&tasks, &subjects, &completions);
        assert_eq!(report.overall_percent, 100);
    }

    #[test]
    fn tasks_for_unknown_subjects_are_excluded() {
        let subjects = [subject(1, "Math", 2)];
        let mut tasks = generate(&subjects);
        tasks.push(ScheduledTask::new("Ghost", fixed_today(), 100));

        let valid = valid_tasks(&tasks, &subjects);
        assert_eq!(valid.len(), 2);
        assert!(valid.iter().all(|t| t.subject() == "Math"));
    }

    #[test]
    fn warn_flags_the_day_before_the_exam() {
        let exam = fixed_today() + Duration::days(2);
        let eve = ScheduledTask::new("Math", exam - Duration::days(1), 300);
        let earlier = ScheduledTask::new("Math", fixed_today(), 300);

        assert!(TaskFlags::derive(&eve, exam, fixed_today(), false).warn);
        assert!(!TaskFlags::derive(&earlier, exam, fixed_today(), false).warn);
    }

    #[test]
    fn missed_requires_past_date_and_not_done() {
        let exam = fixed_today() + Duration::days(5);
        let past = ScheduledTask::new("Math", fixed_today() - Duration::days(1), 300);

        assert!(TaskFlags::derive(&past, exam, fixed_today(), false).missed);
        assert!(!TaskFlags::derive(&past, exam, fixed_today(), true).missed);

        let today_task = ScheduledTask::new("Math", fixed_today(), 300);
        assert!(!TaskFlags::derive(&today_task, exam, fixed_today(), false).missed);
    }
}
