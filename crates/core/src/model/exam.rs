use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::ExamId;
use crate::model::question::Question;
use crate::time::parse_schedule_time;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("exam must contain at least one question")]
    NoQuestions,

    #[error("time per question must be > 0")]
    ZeroTimeBudget,
}

//
// ─── SCHEDULE ──────────────────────────────────────────────────────────────────
//

/// Where an exam's window stands relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Upcoming,
    Open,
    Closed,
}

/// Start/end window of an exam, kept as the strings the teacher entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSchedule {
    start_time: String,
    end_time: String,
}

impl ExamSchedule {
    #[must_use]
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    #[must_use]
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    #[must_use]
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_schedule_time(&self.start_time)
    }

    #[must_use]
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        parse_schedule_time(&self.end_time)
    }

    /// Classifies `now` against the window.
    ///
    /// A bound that cannot be parsed does not restrict availability; the end
    /// bound is inclusive.
    #[must_use]
    pub fn availability(&self, now: DateTime<Utc>) -> Availability {
        if self.starts_at().is_some_and(|start| now < start) {
            return Availability::Upcoming;
        }
        if self.ends_at().is_some_and(|end| now > end) {
            return Availability::Closed;
        }
        Availability::Open
    }
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A persisted exam: an ordered question set plus a per-question time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    id: ExamId,
    title: String,
    teacher: String,
    schedule: ExamSchedule,
    time_per_question: u32,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
}

impl Exam {
    /// Creates an exam.
    ///
    /// # Errors
    ///
    /// Returns `ExamError` if the title is blank, there are no questions, or
    /// the time budget is zero.
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        teacher: impl Into<String>,
        schedule: ExamSchedule,
        time_per_question: u32,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ExamError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ExamError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(ExamError::NoQuestions);
        }
        if time_per_question == 0 {
            return Err(ExamError::ZeroTimeBudget);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            teacher: teacher.into().trim().to_owned(),
            schedule,
            time_per_question,
            questions,
            created_at,
        })
    }

    /// Builds an exam from builder-validated parts without re-checking them.
    pub(crate) fn from_validated(
        id: ExamId,
        title: String,
        teacher: String,
        schedule: ExamSchedule,
        time_per_question: u32,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(!questions.is_empty() && time_per_question > 0);
        Self {
            id,
            title,
            teacher,
            schedule,
            time_per_question,
            questions,
            created_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ExamId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn teacher(&self) -> &str {
        &self.teacher
    }

    #[must_use]
    pub fn schedule(&self) -> &ExamSchedule {
        &self.schedule
    }

    /// Seconds each question may stay open.
    #[must_use]
    pub fn time_per_question(&self) -> u32 {
        self.time_per_question
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
