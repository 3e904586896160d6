use exam_core::model::{ExamDraft, ExamId, ValidationErrors};
use services::{ExamBuilderError, ExamBuilderService};

use crate::state::ViewError;

/// One rejected field, labelled for people rather than by path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrorVm {
    pub field: String,
    pub label: String,
    pub message: &'static str,
}

/// Why a builder submission did not produce an exam.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderFailureVm {
    pub error: ViewError,
    pub fields: Vec<FieldErrorVm>,
}

/// `questions[1].options[2]` → `Question 2, option 3`.
#[must_use]
pub fn field_label(field: &str) -> String {
    let mut parts = Vec::new();
    for segment in field.split('.') {
        let (name, index) = match segment.split_once('[') {
            Some((name, rest)) => (name, rest.trim_end_matches(']').parse::<usize>().ok()),
            None => (segment, None),
        };
        let word = match name {
            "title" => "Title",
            "teacher" => "Teacher",
            "startTime" => "Start time",
            "endTime" => "End time",
            "timePerQuestion" => "Time per question",
            "questions" if index.is_some() => "Question",
            "questions" => "Questions",
            "text" => "text",
            "options" if index.is_some() => "option",
            "options" => "options",
            "correctAnswer" => "correct answer",
            other => other,
        };
        match index {
            Some(i) => parts.push(format!("{word} {}", i + 1)),
            None => parts.push(word.to_owned()),
        }
    }
    parts.join(", ")
}

#[must_use]
pub fn map_field_errors(errors: &ValidationErrors) -> Vec<FieldErrorVm> {
    errors
        .errors()
        .iter()
        .map(|e| FieldErrorVm {
            field: e.field.clone(),
            label: field_label(&e.field),
            message: e.message,
        })
        .collect()
}

/// Validate and save a draft.
///
/// # Errors
///
/// Returns a `BuilderFailureVm` carrying per-field messages when the draft
/// is rejected, or `ViewError::Unknown` with no fields if saving fails.
pub async fn submit_draft(
    builder: &ExamBuilderService,
    draft: &ExamDraft,
) -> Result<ExamId, BuilderFailureVm> {
    builder.submit(draft).await.map_err(|err| {
        let fields = match &err {
            ExamBuilderError::Validation(errors) => map_field_errors(errors),
            _ => Vec::new(),
        };
        BuilderFailureVm {
            error: ViewError::from(&err),
            fields,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::QuestionDraft;

    #[test]
    fn labels_nested_paths() {
        assert_eq!(field_label("title"), "Title");
        assert_eq!(field_label("questions"), "Questions");
        assert_eq!(field_label("questions[0].text"), "Question 1, text");
        assert_eq!(
            field_label("questions[1].options[2]"),
            "Question 2, option 3"
        );
    }

    #[test]
    fn maps_every_draft_error() {
        let draft = ExamDraft {
            title: "ab".into(),
            teacher: "Ms. Frizzle".into(),
            start_time: "2024-05-01T09:00".into(),
            end_time: "2024-05-01T10:00".into(),
            time_per_question: 30,
            questions: vec![QuestionDraft::blank()],
        };
        let errors = draft.validate().unwrap_err();
        let fields = map_field_errors(&errors);
        assert_eq!(fields.len(), errors.len());
        assert_eq!(fields[0].field, "title");
        assert_eq!(
            fields[0].message,
            "Title must be at least 3 characters long."
        );
        assert!(fields.iter().any(|f| f.label == "Question 1, text"));
    }
}
