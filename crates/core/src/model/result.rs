use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::exam::Exam;
use crate::model::ids::ExamId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("correct count ({correct}) exceeds total ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("too many questions for a single result: {len}")]
    TooManyQuestions { len: usize },
}

/// How a single question ended up in a graded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// Graded outcome of one finished exam attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    exam_id: ExamId,
    exam_title: String,
    answers: Vec<Option<usize>>,
    outcomes: Vec<QuestionOutcome>,
    correct: u32,
    total: u32,
    submitted_at: DateTime<Utc>,
}

impl ExamResult {
    /// Grades `answers` against the exam's answer key.
    ///
    /// `answers[i]` is compared with `questions[i].correct_answer`; a missing
    /// answer is never correct.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::AnswerCountMismatch` unless there is exactly one
    /// answer per question.
    pub fn grade(
        exam: &Exam,
        answers: &[Option<usize>],
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if answers.len() != exam.question_count() {
            return Err(ResultError::AnswerCountMismatch {
                expected: exam.question_count(),
                actual: answers.len(),
            });
        }

        let outcomes: Vec<QuestionOutcome> = exam
            .questions()
            .iter()
            .zip(answers)
            .map(|(question, answer)| match answer {
                None => QuestionOutcome::Unanswered,
                Some(_) if question.is_correct(*answer) => QuestionOutcome::Correct,
                Some(_) => QuestionOutcome::Incorrect,
            })
            .collect();

        let total = u32::try_from(answers.len())
            .map_err(|_| ResultError::TooManyQuestions { len: answers.len() })?;
        let correct = outcomes
            .iter()
            .filter(|o| **o == QuestionOutcome::Correct)
            .fold(0_u32, |acc, _| acc.saturating_add(1));

        Ok(Self {
            exam_id: exam.id().clone(),
            exam_title: exam.title().to_owned(),
            answers: answers.to_vec(),
            outcomes,
            correct,
            total,
            submitted_at,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// Outcomes are stored with the answers so a result stays readable after
    /// the exam's answer key is edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` if counts do not line up with the stored answers.
    pub fn from_persisted(
        exam_id: ExamId,
        exam_title: String,
        answers: Vec<Option<usize>>,
        outcomes: Vec<QuestionOutcome>,
        correct: u32,
        total: u32,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        let expected = usize::try_from(total).unwrap_or(usize::MAX);
        if answers.len() != expected {
            return Err(ResultError::AnswerCountMismatch {
                expected,
                actual: answers.len(),
            });
        }
        if outcomes.len() != expected {
            return Err(ResultError::AnswerCountMismatch {
                expected,
                actual: outcomes.len(),
            });
        }
        let counted = outcomes
            .iter()
            .filter(|o| **o == QuestionOutcome::Correct)
            .count();
        if correct > total || usize::try_from(correct).ok() != Some(counted) {
            return Err(ResultError::CountMismatch { correct, total });
        }

        Ok(Self {
            exam_id,
            exam_title,
            answers,
            outcomes,
            correct,
            total,
            submitted_at,
        })
    }

    #[must_use]
    pub fn exam_id(&self) -> &ExamId {
        &self.exam_id
    }

    #[must_use]
    pub fn exam_title(&self) -> &str {
        &self.exam_title
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    /// Score as a percentage in `0.0..=100.0`.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}
