//! Exam authoring input and its field-level validation.
//!
//! An [`ExamDraft`] mirrors what a teacher types into the builder form: free
//! strings and signed numbers that may be out of range. [`ExamDraft::validate`]
//! collects every problem at once, keyed by field path, and only yields an
//! [`ExamData`] when the whole draft is acceptable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::exam::{Exam, ExamSchedule};
use crate::model::ids::ExamId;
use crate::model::question::{OPTION_COUNT, Question};
use crate::time::parse_schedule_time;

/// Shortest accepted exam title, in characters.
pub const MIN_TITLE_CHARS: usize = 3;

/// Shortest accepted time budget per question, in seconds.
pub const MIN_SECONDS_PER_QUESTION: i64 = 5;

/// Default time budget offered by a fresh builder form.
pub const DEFAULT_SECONDS_PER_QUESTION: i64 = 30;

//
// ─── DRAFT INPUT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: i64,
}

impl QuestionDraft {
    /// A blank question as appended by "Add Question".
    #[must_use]
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            options: vec![String::new(); OPTION_COUNT],
            correct_answer: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default = "default_seconds")]
    pub time_per_question: i64,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

fn default_seconds() -> i64 {
    DEFAULT_SECONDS_PER_QUESTION
}

impl Default for ExamDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            teacher: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            time_per_question: DEFAULT_SECONDS_PER_QUESTION,
            questions: Vec::new(),
        }
    }
}

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

/// A single problem attached to a form field such as `questions[1].options[2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors found in one draft, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages attached to exactly `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message)
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exam draft has {} invalid field(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: &'static str) {
        self.errors.push(FieldError {
            field: field.into(),
            message,
        });
    }
}

//
// ─── VALIDATED OUTPUT ──────────────────────────────────────────────────────────
//

/// A builder-validated exam ready to be persisted.
///
/// Only [`ExamDraft::validate`] produces values of this type, so a store
/// never sees unvalidated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamData {
    title: String,
    teacher: String,
    schedule: ExamSchedule,
    time_per_question: u32,
    questions: Vec<Question>,
}

impl ExamData {
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

    #[must_use]
    pub fn time_per_question(&self) -> u32 {
        self.time_per_question
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Attaches the store-assigned id and creation time.
    #[must_use]
    pub fn assign_id(self, id: ExamId, created_at: DateTime<Utc>) -> Exam {
        Exam::from_validated(
            id,
            self.title,
            self.teacher,
            self.schedule,
            self.time_per_question,
            self.questions,
            created_at,
        )
    }
}

impl ExamDraft {
    /// Validates every field and returns the persisted shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` listing each invalid field.
    pub fn validate(&self) -> Result<ExamData, ValidationErrors> {
        let mut errors = Collector::default();

        let title = self.title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            errors.push("title", "Title must be at least 3 characters long.");
        }
        let teacher = self.teacher.trim();
        if teacher.is_empty() {
            errors.push("teacher", "Teacher name is required.");
        }

        let start_time = self.start_time.trim();
        let end_time = self.end_time.trim();
        if start_time.is_empty() {
            errors.push("startTime", "Start time is required.");
        }
        if end_time.is_empty() {
            errors.push("endTime", "End time is required.");
        }
        if let (Some(start), Some(end)) = (
            parse_schedule_time(start_time),
            parse_schedule_time(end_time),
        ) {
            if end < start {
                errors.push("endTime", "End time must be after start time.");
            }
        }

        let time_per_question = u32::try_from(self.time_per_question)
            .ok()
            .filter(|secs| i64::from(*secs) >= MIN_SECONDS_PER_QUESTION);
        if time_per_question.is_none() {
            errors.push(
                "timePerQuestion",
                "Time per question must be at least 5 seconds.",
            );
        }

        if self.questions.is_empty() {
            errors.push("questions", "Please add at least one question.");
        }
        let mut questions = Vec::with_capacity(self.questions.len());
        for (index, draft) in self.questions.iter().enumerate() {
            if let Some(question) = validate_question(index, draft, &mut errors) {
                questions.push(question);
            }
        }

        match time_per_question {
            Some(time_per_question) if errors.errors.is_empty() => Ok(ExamData {
                title: title.to_owned(),
                teacher: teacher.to_owned(),
                schedule: ExamSchedule::new(start_time, end_time),
                time_per_question,
                questions,
            }),
            _ => Err(ValidationErrors {
                errors: errors.errors,
            }),
        }
    }
}

fn validate_question(
    index: usize,
    draft: &QuestionDraft,
    errors: &mut Collector,
) -> Option<Question> {
    let before = errors.errors.len();
    let prefix = format!("questions[{index}]");

    if draft.text.trim().is_empty() {
        errors.push(format!("{prefix}.text"), "Question text cannot be empty.");
    }
    if draft.options.len() != OPTION_COUNT {
        errors.push(format!("{prefix}.options"), "Please provide 4 options.");
    }
    for (option_index, option) in draft.options.iter().enumerate() {
        if option.trim().is_empty() {
            errors.push(
                format!("{prefix}.options[{option_index}]"),
                "Option text cannot be empty.",
            );
        }
    }
    let correct_answer = usize::try_from(draft.correct_answer)
        .ok()
        .filter(|answer| *answer < OPTION_COUNT);
    if correct_answer.is_none() {
        errors.push(
            format!("{prefix}.correctAnswer"),
            "Correct answer must be one of the 4 options.",
        );
    }

    if errors.errors.len() != before {
        return None;
    }
    let options = draft.options.iter().map(|o| o.trim().to_owned()).collect();
    Question::new(draft.text.trim(), options, correct_answer?).ok()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
