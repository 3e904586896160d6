use thiserror::Error;

/// Number of options every authored question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

/// A multiple-choice question.
///
/// `options` keeps the authored order; `correct_answer` indexes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Creates a question.
    ///
    /// Only the structural invariants are checked here. The builder enforces
    /// the stricter authoring rules (exactly four non-empty options).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, there are no options, or
    /// `correct_answer` does not index into `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            text,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// True when `answer` is the correct option. `None` is never correct.
    #[must_use]
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["3", "4", "5", "6"].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn builds_valid_question() {
        let q = Question::new("What is 2 + 2?", options(), 1).unwrap();
        assert_eq!(q.option_count(), OPTION_COUNT);
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let err = Question::new("Q", options(), 4).unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectAnswerOutOfRange { index: 4, len: 4 }
        );
    }

    #[test]
    fn rejects_blank_text_and_missing_options() {
        assert_eq!(
            Question::new("  ", options(), 0).unwrap_err(),
            QuestionError::EmptyText
        );
        assert_eq!(
            Question::new("Q", Vec::new(), 0).unwrap_err(),
            QuestionError::NoOptions
        );
    }
}
