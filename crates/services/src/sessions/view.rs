use chrono::{DateTime, Utc};
use std::sync::Arc;

use exam_core::model::{ExamId, ResultId};
use storage::repository::{ResultRepository, StoredResult};

use crate::error::SessionError;

/// Presentation-agnostic list item for a stored result.
///
/// No pre-formatted strings; the UI decides how to show scores and dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultListItem {
    pub id: ResultId,
    pub exam_id: ExamId,
    pub exam_title: String,
    pub correct: u32,
    pub total: u32,
    pub submitted_at: DateTime<Utc>,
}

impl ResultListItem {
    #[must_use]
    pub fn from_stored(stored: &StoredResult) -> Self {
        let result = &stored.result;
        Self {
            id: stored.id,
            exam_id: result.exam_id().clone(),
            exam_title: result.exam_title().to_owned(),
            correct: result.correct(),
            total: result.total(),
            submitted_at: result.submitted_at(),
        }
    }
}

/// Read access to graded attempts.
#[derive(Clone)]
pub struct ResultService {
    results: Arc<dyn ResultRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Latest result for an exam, if it has been taken.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if repository access fails.
    pub async fn latest_for_exam(
        &self,
        exam_id: &ExamId,
    ) -> Result<Option<StoredResult>, SessionError> {
        Ok(self.results.latest_result_for_exam(exam_id).await?)
    }

    /// Most recent results first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if repository access fails.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ResultListItem>, SessionError> {
        let rows = self.results.list_results(limit).await?;
        Ok(rows.iter().map(ResultListItem::from_stored).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exam_core::model::{Exam, ExamResult, ExamSchedule, Question};
    use exam_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn exam(id: &str) -> Exam {
        Exam::new(
            ExamId::new(id).unwrap(),
            format!("Exam {id}"),
            "Mr. Davison",
            ExamSchedule::new("", ""),
            30,
            vec![Question::new("2 + 2?", vec!["3".into(), "4".into()], 1).unwrap()],
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = ResultService::new(repo.clone());

        let mut ids = Vec::new();
        for (minutes, exam_id) in [(0, "a"), (20, "b"), (10, "c")] {
            let result = ExamResult::grade(
                &exam(exam_id),
                &[Some(1)],
                fixed_now() + Duration::minutes(minutes),
            )
            .unwrap();
            ids.push(repo.append_result(&result).await.unwrap());
        }

        let recent = service.list_recent(2).await.unwrap();
        let titles: Vec<&str> = recent.iter().map(|r| r.exam_title.as_str()).collect();
        assert_eq!(titles, vec!["Exam b", "Exam c"]);
        assert_eq!(recent[0].id, ids[1]);
        assert_eq!(recent[0].correct, 1);
        assert_eq!(recent[0].total, 1);

        assert_eq!(service.list_recent(10).await.unwrap().len(), 3);
        assert!(service.list_recent(0).await.unwrap().is_empty());
    }
}
