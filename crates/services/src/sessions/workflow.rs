use std::sync::Arc;

use exam_core::model::{Availability, ExamId, ExamResult, ResultId};
use storage::repository::{ExamRepository, ResultRepository};

use super::service::{ExamSession, TimeoutPolicy};
use crate::Clock;
use crate::error::SessionError;

/// A finished session after grading and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAttempt {
    pub result_id: ResultId,
    pub result: ExamResult,
}

/// Orchestrates attempt start and graded submission.
#[derive(Clone)]
pub struct ExamAttemptService {
    clock: Clock,
    exams: Arc<dyn ExamRepository>,
    results: Arc<dyn ResultRepository>,
    policy: TimeoutPolicy,
}

impl ExamAttemptService {
    #[must_use]
    pub fn new(
        clock: Clock,
        exams: Arc<dyn ExamRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            exams,
            results,
            policy: TimeoutPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.policy
    }

    /// Load an exam and open a session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ExamNotFound` if the exam does not exist,
    /// `SessionError::NotYetOpen` / `SessionError::Closed` outside its window,
    /// and `SessionError::Storage` for repository failures.
    pub async fn start_attempt(&self, exam_id: &ExamId) -> Result<ExamSession, SessionError> {
        let exam = self
            .exams
            .get_exam(exam_id)
            .await?
            .ok_or(SessionError::ExamNotFound)?;

        match exam.schedule().availability(self.clock.now()) {
            Availability::Upcoming => return Err(SessionError::NotYetOpen),
            Availability::Closed => return Err(SessionError::Closed),
            Availability::Open => {}
        }

        tracing::info!(exam_id = %exam_id, questions = exam.question_count(), "attempt started");
        ExamSession::new(exam, self.policy)
    }

    /// Grade a finished session and persist the result.
    ///
    /// The session is borrowed, so a failed save can be retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last question is done,
    /// `SessionError::Result` if grading fails and `SessionError::Storage` if
    /// the result cannot be stored.
    pub async fn submit(&self, session: &ExamSession) -> Result<SubmittedAttempt, SessionError> {
        if !session.is_finished() {
            return Err(SessionError::NotFinished);
        }

        let exam = session.exam();
        tracing::info!(
            exam_id = %exam.id(),
            answers = ?session.answers(),
            "final answers submitted"
        );

        let result = ExamResult::grade(exam, session.answers(), self.clock.now())?;
        let result_id = self.results.append_result(&result).await.map_err(|err| {
            tracing::error!(exam_id = %exam.id(), error = %err, "failed to store exam result");
            err
        })?;

        tracing::info!(
            exam_id = %exam.id(),
            result_id = %result_id,
            correct = result.correct(),
            total = result.total(),
            "exam result stored"
        );
        Ok(SubmittedAttempt { result_id, result })
    }
}
