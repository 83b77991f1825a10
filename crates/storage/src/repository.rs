use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use planner_core::model::{Difficulty, Subject, SubjectError, SubjectId};

/// The single key under which the subject list is persisted.
pub const SUBJECTS_KEY: &str = "subjects";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a subject.
///
/// This mirrors the domain `Subject` minus its id: the stored payload is a
/// plain JSON list, and ids are reassigned in list order on load. The list is
/// the whole value of the `"subjects"` key; there is no schema versioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: String,
    pub exam_date: NaiveDate,
    pub difficulty: Difficulty,
}

impl SubjectRecord {
    #[must_use]
    pub fn from_subject(subject: &Subject) -> Self {
        Self {
            name: subject.name().to_owned(),
            exam_date: subject.exam_date(),
            difficulty: subject.difficulty(),
        }
    }

    /// Convert the record back into a domain `Subject`.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError` if the stored name fails validation.
    pub fn into_subject(self, id: SubjectId) -> Result<Subject, SubjectError> {
        Subject::new(id, self.name, self.exam_date, self.difficulty)
    }
}

/// Serializes the subject list into the stored JSON payload.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_subjects(subjects: &[SubjectRecord]) -> Result<String, StorageError> {
    serde_json::to_string(subjects).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Decodes a stored payload, treating malformed JSON as the empty list.
///
/// A missing or corrupted `"subjects"` entry must never block the dashboard
/// from initializing, so decoding is deliberately lenient.
#[must_use]
pub fn decode_subjects(raw: &str) -> Vec<SubjectRecord> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Repository contract for the persisted subject list.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Persist the whole subject list, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be stored.
    async fn save_subjects(&self, subjects: &[SubjectRecord]) -> Result<(), StorageError>;

    /// Fetch the persisted subject list.
    ///
    /// A missing or malformed entry loads as the empty list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures, never for a missing
    /// entry.
    async fn load_subjects(&self) -> Result<Vec<SubjectRecord>, StorageError>;
}

/// Simple in-memory store for testing and prototyping.
///
/// Keeps the same key/value shape as the SQLite backend so the lenient
/// decode path is exercised identically.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw value, bypassing encoding. Test hook for corrupt data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.insert(key.to_owned(), value.to_owned());
        }
    }
}

#[async_trait]
impl SubjectStore for InMemoryStore {
    async fn save_subjects(&self, subjects: &[SubjectRecord]) -> Result<(), StorageError> {
        let payload = encode_subjects(subjects)?;
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(SUBJECTS_KEY.to_owned(), payload);
        Ok(())
    }

    async fn load_subjects(&self) -> Result<Vec<SubjectRecord>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(SUBJECTS_KEY)
            .map(|raw| decode_subjects(raw))
            .unwrap_or_default())
    }
}

/// Aggregates the subject store behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub subjects: Arc<dyn SubjectStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let subjects: Arc<dyn SubjectStore> = Arc::new(InMemoryStore::new());
        Self { subjects }
    }
}
