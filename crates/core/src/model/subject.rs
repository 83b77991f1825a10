use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SubjectId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject name cannot be empty")]
    EmptyName,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum HourBudgetError {
    #[error("hour budget must be positive and finite, got {provided}")]
    InvalidHours { provided: f64 },

    #[error("easy budget must not exceed medium, medium must not exceed hard")]
    NotMonotonic,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// How demanding a subject is, which decides its total revision-hour budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Error type for parsing a difficulty from string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{provided}` (expected easy, medium, or hard)")]
pub struct ParseDifficultyError {
    provided: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError {
                provided: other.to_owned(),
            }),
        }
    }
}

//
// ─── HOUR BUDGET ───────────────────────────────────────────────────────────────
//

/// Maps a difficulty to the total revision hours a subject receives.
///
/// Two presets exist because the original planner shipped two generation
/// modes with different tables. `standard()` (4/6/8) is the canonical
/// mapping; `light()` (2/4/6) stays available as explicit configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourBudget {
    easy: f64,
    medium: f64,
    hard: f64,
}

impl HourBudget {
    /// Canonical mapping: easy 4h, medium 6h, hard 8h.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            easy: 4.0,
            medium: 6.0,
            hard: 8.0,
        }
    }

    /// Reduced mapping: easy 2h, medium 4h, hard 6h.
    #[must_use]
    pub fn light() -> Self {
        Self {
            easy: 2.0,
            medium: 4.0,
            hard: 6.0,
        }
    }

    /// Creates a custom mapping.
    ///
    /// # Errors
    ///
    /// Returns `HourBudgetError::InvalidHours` if any budget is not positive
    /// and finite, or `HourBudgetError::NotMonotonic` if the budgets do not
    /// grow with difficulty.
    pub fn new(easy: f64, medium: f64, hard: f64) -> Result<Self, HourBudgetError> {
        for provided in [easy, medium, hard] {
            if !provided.is_finite() || provided <= 0.0 {
                return Err(HourBudgetError::InvalidHours { provided });
            }
        }
        if easy > medium || medium > hard {
            return Err(HourBudgetError::NotMonotonic);
        }
        Ok(Self { easy, medium, hard })
    }

    /// Total revision hours for the given difficulty.
    #[must_use]
    pub fn hours_for(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

impl Default for HourBudget {
    fn default() -> Self {
        Self::standard()
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A subject the user is revising for, with its exam date and difficulty.
///
/// Subjects are created from user input, held in an ordered list, and only
/// ever appended to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: SubjectId,
    name: String,
    exam_date: NaiveDate,
    difficulty: Difficulty,
}

impl Subject {
    /// Creates a new Subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        exam_date: NaiveDate,
        difficulty: Difficulty,
    ) -> Result<Self, SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            exam_date,
            difficulty,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exam_date(&self) -> NaiveDate {
        self.exam_date
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
