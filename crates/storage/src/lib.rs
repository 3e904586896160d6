#![forbid(unsafe_code)]

pub mod repository;
pub mod samples;
pub mod sqlite;

pub use repository::{
    AccountRecord, AccountRepository, ExamDocument, ExamRepository, InMemoryRepository,
    NewAccountRecord, NewExamRecord, QuestionDocument, ResultRepository, Storage, StorageError,
    StoredResult,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
