use exam_core::model::{ExamId, ExamResult, ResultId};

use super::SqliteRepository;
use super::mapping::{
    answers_to_json, map_result_row, outcomes_to_json, result_id_from_i64, result_id_to_i64,
};
use crate::repository::{ResultRepository, StorageError, StoredResult};

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO exam_results (exam_id, exam_title, answers, outcomes, correct, total, submitted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(result.exam_id().as_str())
        .bind(result.exam_title())
        .bind(answers_to_json(result.answers())?)
        .bind(outcomes_to_json(result.outcomes())?)
        .bind(i64::from(result.correct()))
        .bind(i64::from(result.total()))
        .bind(result.submitted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        result_id_from_i64(res.last_insert_rowid())
    }

    async fn get_result(&self, id: ResultId) -> Result<StoredResult, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, exam_id, exam_title, answers, outcomes, correct, total, submitted_at
            FROM exam_results
            WHERE id = ?1
            ",
        )
        .bind(result_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_result_row(&row)
    }

    async fn latest_result_for_exam(
        &self,
        exam_id: &ExamId,
    ) -> Result<Option<StoredResult>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, exam_id, exam_title, answers, outcomes, correct, total, submitted_at
            FROM exam_results
            WHERE exam_id = ?1
            ORDER BY submitted_at DESC, id DESC
            LIMIT 1
            ",
        )
        .bind(exam_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_result_row).transpose()
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, exam_id, exam_title, answers, outcomes, correct, total, submitted_at
            FROM exam_results
            ORDER BY submitted_at DESC, id DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_result_row).collect()
    }
}
