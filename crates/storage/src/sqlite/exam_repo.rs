use exam_core::model::{Exam, ExamId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{exam_id_from_str, ser};
use crate::repository::{ExamDocument, ExamRepository, NewExamRecord, StorageError};

fn decode_document(id: ExamId, raw: &str) -> Result<Exam, StorageError> {
    let doc: ExamDocument = serde_json::from_str(raw).map_err(ser)?;
    doc.into_exam(id)
}

fn map_exam_row(row: &SqliteRow) -> Result<(ExamId, Result<Exam, StorageError>), StorageError> {
    let id = exam_id_from_str(row.try_get("id").map_err(ser)?)?;
    let raw: String = row.try_get("document").map_err(ser)?;
    let exam = decode_document(id.clone(), &raw);
    Ok((id, exam))
}

#[async_trait::async_trait]
impl ExamRepository for SqliteRepository {
    async fn insert_exam(&self, exam: NewExamRecord) -> Result<ExamId, StorageError> {
        let id = ExamId::generate();
        let created_at = exam.created_at;
        let exam = exam.data.assign_id(id.clone(), created_at);
        let document = serde_json::to_string(&ExamDocument::from_exam(&exam)).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO exams (id, document, created_at)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(id.as_str())
        .bind(document)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                StorageError::Conflict
            } else {
                StorageError::Connection(e.to_string())
            }
        })?;

        Ok(id)
    }

    async fn get_exam(&self, id: &ExamId) -> Result<Option<Exam>, StorageError> {
        let row = sqlx::query("SELECT document FROM exams WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("document").map_err(ser)?;
        decode_document(id.clone(), &raw).map(Some)
    }

    async fn list_exams(&self) -> Result<Vec<Exam>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, document
            FROM exams
            ORDER BY created_at DESC, rowid DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut exams = Vec::with_capacity(rows.len());
        for row in &rows {
            match map_exam_row(row) {
                Ok((_, Ok(exam))) => exams.push(exam),
                Ok((id, Err(err))) => {
                    tracing::warn!(exam_id = %id, error = %err, "skipping malformed exam document");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping exam row with unreadable id");
                }
            }
        }
        Ok(exams)
    }
}
