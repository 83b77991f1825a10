use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{
    decode_subjects, encode_subjects, StorageError, SubjectRecord, SubjectStore, SUBJECTS_KEY,
};

use super::SqliteRepository;

#[async_trait]
impl SubjectStore for SqliteRepository {
    async fn save_subjects(&self, subjects: &[SubjectRecord]) -> Result<(), StorageError> {
        let payload = encode_subjects(subjects)?;

        sqlx::query(
            r"
            INSERT INTO planner_kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(SUBJECTS_KEY)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn load_subjects(&self) -> Result<Vec<SubjectRecord>, StorageError> {
        let row = sqlx::query("SELECT value FROM planner_kv WHERE key = ?1")
            .bind(SUBJECTS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let raw: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(decode_subjects(&raw))
    }
}
