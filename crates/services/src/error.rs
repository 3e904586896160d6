//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{CredentialError, ResultError, ValidationErrors};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by session construction, attempts and results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("exam has no questions")]
    EmptyExam,
    #[error("time per question must be > 0")]
    ZeroTimeBudget,
    #[error("question {question} points at option {index} but has {len} options")]
    InvalidAnswerKey {
        question: usize,
        index: usize,
        len: usize,
    },
    #[error("exam not found")]
    ExamNotFound,
    #[error("exam has not opened yet")]
    NotYetOpen,
    #[error("exam is closed")]
    Closed,
    #[error("session is not finished")]
    NotFinished,
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ExamService`.
///
/// Storage faults are not retried; callers show one message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error("failed to save exam")]
    Save(#[source] StorageError),
    #[error("failed to fetch exams")]
    Fetch(#[source] StorageError),
}

/// Errors emitted by `ExamBuilderService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamBuilderError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Exam(#[from] ExamServiceError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("Incorrect password.")]
    WrongPassword,
    #[error("stored password hash is unreadable")]
    CorruptHash,
    #[error("failed to hash password")]
    Hashing,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
