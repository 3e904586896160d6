use services::{ExamBuilderError, ExamServiceError, SessionError};

/// User-facing failure of a screen action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    ExamNotFound,
    NotYetOpen,
    Closed,
    /// Builder form rejected; messages are per field.
    Invalid,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ViewError::ExamNotFound => "This exam does not exist.",
            ViewError::NotYetOpen => "This exam has not started yet.",
            ViewError::Closed => "This exam is closed.",
            ViewError::Invalid => "Please fix the highlighted fields.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::ExamNotFound => ViewError::ExamNotFound,
            SessionError::NotYetOpen => ViewError::NotYetOpen,
            SessionError::Closed => ViewError::Closed,
            _ => ViewError::Unknown,
        }
    }
}

impl From<&ExamBuilderError> for ViewError {
    fn from(err: &ExamBuilderError) -> Self {
        match err {
            ExamBuilderError::Validation(_) => ViewError::Invalid,
            _ => ViewError::Unknown,
        }
    }
}

/// Storage faults while loading or saving exams are shown as one message.
impl From<&ExamServiceError> for ViewError {
    fn from(_err: &ExamServiceError) -> Self {
        ViewError::Unknown
    }
}
