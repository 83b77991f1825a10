mod ids;
mod subject;
mod task;

pub use ids::{ParseIdError, SubjectId};
pub use subject::{
    Difficulty, HourBudget, HourBudgetError, ParseDifficultyError, Subject, SubjectError,
};
pub use task::{ScheduledTask, TaskKey};
