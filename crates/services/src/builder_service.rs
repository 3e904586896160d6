use std::sync::Arc;

use exam_core::model::{ExamDraft, ExamId};

use crate::error::ExamBuilderError;
use crate::exam_service::ExamService;

/// Validates teacher drafts and hands clean data to the exam store.
#[derive(Clone)]
pub struct ExamBuilderService {
    exams: Arc<ExamService>,
}

impl ExamBuilderService {
    #[must_use]
    pub fn new(exams: Arc<ExamService>) -> Self {
        Self { exams }
    }

    /// Validate every field, then save.
    ///
    /// Nothing reaches the store unless the whole draft is valid.
    ///
    /// # Errors
    ///
    /// Returns `ExamBuilderError::Validation` with all field errors, or
    /// `ExamBuilderError::Exam` if the save fails.
    pub async fn submit(&self, draft: &ExamDraft) -> Result<ExamId, ExamBuilderError> {
        let data = draft.validate().map_err(|errors| {
            tracing::debug!(errors = errors.len(), "exam draft rejected");
            errors
        })?;
        let id = self.exams.save_exam(data).await?;
        Ok(id)
    }
}
