use std::sync::Arc;

use exam_core::model::{Exam, ExamData, ExamId};
use storage::repository::{ExamRepository, NewExamRecord};

use crate::Clock;
use crate::error::ExamServiceError;

/// Facade over the exam store: save, list and load.
#[derive(Clone)]
pub struct ExamService {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
}

impl ExamService {
    #[must_use]
    pub fn new(clock: Clock, exams: Arc<dyn ExamRepository>) -> Self {
        Self { clock, exams }
    }

    /// Persist validated exam data; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Save` for any storage fault.
    pub async fn save_exam(&self, data: ExamData) -> Result<ExamId, ExamServiceError> {
        let title = data.title().to_owned();
        let record = NewExamRecord {
            data,
            created_at: self.clock.now(),
        };
        match self.exams.insert_exam(record).await {
            Ok(id) => {
                tracing::info!(exam_id = %id, title = %title, "exam saved");
                Ok(id)
            }
            Err(err) => {
                tracing::error!(title = %title, error = %err, "failed to save exam");
                Err(ExamServiceError::Save(err))
            }
        }
    }

    /// All exams, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Fetch` for any storage fault.
    pub async fn list_exams(&self) -> Result<Vec<Exam>, ExamServiceError> {
        self.exams.list_exams().await.map_err(|err| {
            tracing::error!(error = %err, "failed to fetch exams");
            ExamServiceError::Fetch(err)
        })
    }

    /// Fetch one exam. Returns `Ok(None)` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `ExamServiceError::Fetch` for storage faults or a malformed document.
    pub async fn get_exam(&self, id: &ExamId) -> Result<Option<Exam>, ExamServiceError> {
        self.exams.get_exam(id).await.map_err(|err| {
            tracing::error!(exam_id = %id, error = %err, "failed to fetch exam");
            ExamServiceError::Fetch(err)
        })
    }
}
