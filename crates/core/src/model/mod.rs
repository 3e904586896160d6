mod account;
mod draft;
mod exam;
mod ids;
mod question;
mod result;

pub use ids::{AccountId, ExamId, ParseIdError, ResultId};

pub use account::{Account, CredentialError, Credentials, Email, MIN_PASSWORD_CHARS, Role};
pub use draft::{
    DEFAULT_SECONDS_PER_QUESTION, ExamData, ExamDraft, FieldError, MIN_SECONDS_PER_QUESTION,
    MIN_TITLE_CHARS, QuestionDraft, ValidationErrors,
};
pub use exam::{Availability, Exam, ExamError, ExamSchedule};
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use result::{ExamResult, QuestionOutcome, ResultError};
