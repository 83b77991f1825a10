#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{Storage, StorageError, SubjectRecord, SubjectStore, SUBJECTS_KEY};
pub use sqlite::{SqliteInitError, SqliteRepository};
