use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use planner_core::Clock;
use planner_core::model::{HourBudget, Subject, SubjectId};
use planner_core::scheduler::{SchedulePlan, Scheduler};
use storage::repository::{SubjectRecord, SubjectStore};

use crate::error::PlannerError;

/// Per-subject warning raised when an exam date is not after the reference
/// date. Surfaced synchronously to the caller; it never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateNotice {
    pub subject: String,
    pub exam_date: NaiveDate,
}

impl fmt::Display for InvalidDateNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid exam date for {}: {} is not after today",
            self.subject, self.exam_date
        )
    }
}

/// One scheduling run: the plan plus the notices the caller must surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSchedule {
    pub today: NaiveDate,
    pub plan: SchedulePlan,
    pub notices: Vec<InvalidDateNotice>,
}

/// Orchestrates subject persistence and schedule generation.
///
/// The service owns no schedule state itself; each `generate` call maps an
/// immutable subject snapshot to a fresh plan.
#[derive(Clone)]
pub struct PlannerService {
    clock: Clock,
    store: Arc<dyn SubjectStore>,
    scheduler: Scheduler,
}

impl PlannerService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn SubjectStore>) -> Self {
        Self {
            clock,
            store,
            scheduler: Scheduler::new(),
        }
    }

    /// Replaces the difficulty-to-hours mapping used for generation.
    #[must_use]
    pub fn with_budget(mut self, budget: HourBudget) -> Self {
        self.scheduler = self.scheduler.clone().with_budget(budget);
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Persist the whole subject list under the `"subjects"` key.
    ///
    /// This is the "proceed to the dashboard" write: the previous entry is
    /// replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Storage` if the write fails.
    pub async fn save_subjects(&self, subjects: &[Subject]) -> Result<(), PlannerError> {
        let records: Vec<SubjectRecord> = subjects.iter().map(SubjectRecord::from_subject).collect();
        self.store.save_subjects(&records).await?;
        info!(count = records.len(), "saved subject list");
        Ok(())
    }

    /// Load the persisted subject list, assigning ids in list order.
    ///
    /// Missing or malformed entries load as the empty list; individual
    /// records that no longer validate are skipped with a warning rather
    /// than failing the whole load.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Storage` for backend failures.
    pub async fn load_subjects(&self) -> Result<Vec<Subject>, PlannerError> {
        let records = self.store.load_subjects().await?;
        let subjects = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let name = record.name.clone();
                let id = SubjectId::new(u64::try_from(index).unwrap_or(u64::MAX));
                match record.into_subject(id) {
                    Ok(subject) => Some(subject),
                    Err(err) => {
                        warn!(%err, %name, "skipping invalid stored subject");
                        None
                    }
                }
            })
            .collect();
        Ok(subjects)
    }

    /// Run the scheduler against the given subjects as of the clock's date.
    ///
    /// Subjects whose exam is today or already past contribute no tasks and
    /// produce one `InvalidDateNotice` each; all other subjects are
    /// scheduled normally.
    #[must_use]
    pub fn generate(&self, subjects: &[Subject]) -> GeneratedSchedule {
        let today = self.clock.today();
        let plan = self.scheduler.generate(subjects, today);

        let notices: Vec<InvalidDateNotice> = plan
            .rejected
            .iter()
            .map(|rejected| InvalidDateNotice {
                subject: rejected.name.clone(),
                exam_date: rejected.exam_date,
            })
            .collect();

        for notice in &notices {
            warn!(subject = %notice.subject, exam_date = %notice.exam_date, "rejected subject");
        }
        info!(
            tasks = plan.task_count(),
            rejected = notices.len(),
            %today,
            "generated schedule"
        );

        GeneratedSchedule {
            today,
            plan,
            notices,
        }
    }

    /// Load the stored subjects and generate a schedule from them — the
    /// dashboard-initialization flow.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::Storage` for backend failures.
    pub async fn generate_from_store(
        &self,
    ) -> Result<(Vec<Subject>, GeneratedSchedule), PlannerError> {
        let subjects = self.load_subjects().await?;
        let generated = self.generate(&subjects);
        Ok((subjects, generated))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use planner_core::model::Difficulty;
    use planner_core::time::{fixed_clock, fixed_today};
    use storage::repository::InMemoryStore;

    fn subject(id: u64, name: &str, days_out: i64, difficulty: Difficulty) -> Subject {
        Subject::new(
            SubjectId::new(id),
            name,
            fixed_today() + Duration::days(days_out),
            difficulty,
        )
        .unwrap()
    }

    fn service() -> PlannerService {
        PlannerService::new(fixed_clock(), Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn save_and_load_round_trips_in_list_order() {
        let service = service();
        let subjects = vec![
            subject(0, "Math", 5, Difficulty::Medium),
            subject(1, "Bio", 3, Difficulty::Easy),
        ];

        service.save_subjects(&subjects).await.unwrap();
        let loaded = service.load_subjects().await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name(), "Math");
        assert_eq!(loaded[0].id(), SubjectId::new(0));
        assert_eq!(loaded[1].name(), "Bio");
        assert_eq!(loaded[1].id(), SubjectId::new(1));
    }

    #[tokio::test]
    async fn empty_store_generates_empty_schedule() {
        let service = service();
        let (subjects, generated) = service.generate_from_store().await.unwrap();

        assert!(subjects.is_empty());
        assert!(generated.plan.is_empty());
        assert!(generated.notices.is_empty());
    }

    #[test]
    fn invalid_dates_become_notices_without_aborting() {
        let service = service();
        let subjects = [
            subject(0, "Old", 0, Difficulty::Easy),
            subject(1, "Math", 2, Difficulty::Medium),
        ];

        let generated = service.generate(&subjects);

        assert_eq!(generated.notices.len(), 1);
        assert_eq!(generated.notices[0].subject, "Old");
        assert_eq!(generated.plan.task_count(), 2);
    }

    #[test]
    fn notice_names_the_subject() {
        let service = service();
        let generated = service.generate(&[subject(0, "History", -1, Difficulty::Hard)]);

        let message = generated.notices[0].to_string();
        assert!(message.contains("History"));
    }

    #[test]
    fn with_budget_changes_allocations() {
        let service = service().with_budget(HourBudget::light());
        let generated = service.generate(&[subject(0, "Math", 2, Difficulty::Medium)]);

        assert!(generated.plan.tasks.iter().all(|t| t.hours() == 2.0));
    }
}
