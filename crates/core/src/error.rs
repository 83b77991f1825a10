use thiserror::Error;

use crate::model::{HourBudgetError, SubjectError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    HourBudget(#[from] HourBudgetError),
}
