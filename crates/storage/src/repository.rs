use async_trait::async_trait;
use chrono::{DateTime, Utc};
use exam_core::model::{
    Account, AccountId, Email, Exam, ExamData, ExamId, ExamResult, ExamSchedule, Question,
    QuestionOutcome, ResultId, Role,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::sqlite::mapping::ser;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── EXAM DOCUMENTS ────────────────────────────────────────────────────────────
//

/// Insert payload for a new exam. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewExamRecord {
    pub data: ExamData,
    pub created_at: DateTime<Utc>,
}

/// Persisted document shape of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Persisted document shape of an exam.
///
/// Field names are the camelCase keys written to the `exams` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    pub title: String,
    /// Absent in records written before exams carried a teacher name.
    #[serde(default)]
    pub teacher: String,
    pub start_time: String,
    pub end_time: String,
    pub time_per_question: u32,
    pub questions: Vec<QuestionDocument>,
    pub created_at: DateTime<Utc>,
}

impl ExamDocument {
    #[must_use]
    pub fn from_exam(exam: &Exam) -> Self {
        Self {
            title: exam.title().to_owned(),
            teacher: exam.teacher().to_owned(),
            start_time: exam.schedule().start_time().to_owned(),
            end_time: exam.schedule().end_time().to_owned(),
            time_per_question: exam.time_per_question(),
            questions: exam
                .questions()
                .iter()
                .map(|q| QuestionDocument {
                    text: q.text().to_owned(),
                    options: q.options().to_vec(),
                    correct_answer: q.correct_answer(),
                })
                .collect(),
            created_at: exam.created_at(),
        }
    }

    /// Convert the document back into a domain `Exam`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the document breaks a domain
    /// invariant (no questions, zero time budget, answer index out of range).
    pub fn into_exam(self, id: ExamId) -> Result<Exam, StorageError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| Question::new(q.text, q.options, q.correct_answer).map_err(ser))
            .collect::<Result<Vec<_>, _>>()?;

        Exam::new(
            id,
            self.title,
            self.teacher,
            ExamSchedule::new(self.start_time, self.end_time),
            self.time_per_question,
            questions,
            self.created_at,
        )
        .map_err(ser)
    }
}

//
// ─── RESULT DOCUMENTS ──────────────────────────────────────────────────────────
//

/// A stored result together with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub id: ResultId,
    pub result: ExamResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutcomeDocument {
    Correct,
    Incorrect,
    Unanswered,
}

impl From<QuestionOutcome> for OutcomeDocument {
    fn from(value: QuestionOutcome) -> Self {
        match value {
            QuestionOutcome::Correct => Self::Correct,
            QuestionOutcome::Incorrect => Self::Incorrect,
            QuestionOutcome::Unanswered => Self::Unanswered,
        }
    }
}

impl From<OutcomeDocument> for QuestionOutcome {
    fn from(value: OutcomeDocument) -> Self {
        match value {
            OutcomeDocument::Correct => Self::Correct,
            OutcomeDocument::Incorrect => Self::Incorrect,
            OutcomeDocument::Unanswered => Self::Unanswered,
        }
    }
}

//
// ─── ACCOUNTS ──────────────────────────────────────────────────────────────────
//

/// Insert payload for a new account. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccountRecord {
    pub email: Email,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An account plus the credential material needed to verify a sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub account: Account,
    pub password_hash: String,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for authored exams.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Persist a new exam under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the exam cannot be stored.
    async fn insert_exam(&self, exam: NewExamRecord) -> Result<ExamId, StorageError>;

    /// Fetch an exam by id, `None` if there is no such exam.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored document is
    /// malformed, or other storage errors.
    async fn get_exam(&self, id: &ExamId) -> Result<Option<Exam>, StorageError>;

    /// List all exams, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing cannot be read.
    async fn list_exams(&self) -> Result<Vec<Exam>, StorageError>;
}

/// Repository contract for graded attempts.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a graded attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: ResultId) -> Result<StoredResult, StorageError>;

    /// Latest result recorded for an exam, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn latest_result_for_exam(
        &self,
        exam_id: &ExamId,
    ) -> Result<Option<StoredResult>, StorageError>;

    /// Most recent results first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError>;
}

/// Repository contract for sign-in accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Look up an account by its normalised email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn find_account(&self, email: &Email) -> Result<Option<AccountRecord>, StorageError>;

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn insert_account(&self, account: NewAccountRecord) -> Result<Account, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct ExamTable {
    next_seq: u64,
    rows: Vec<(u64, Exam)>,
}

#[derive(Default)]
struct ResultTable {
    next_id: u64,
    rows: Vec<StoredResult>,
}

#[derive(Default)]
struct AccountTable {
    next_id: u64,
    rows: HashMap<Email, AccountRecord>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    exams: Arc<Mutex<ExamTable>>,
    results: Arc<Mutex<ResultTable>>,
    accounts: Arc<Mutex<AccountTable>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExamRepository for InMemoryRepository {
    async fn insert_exam(&self, exam: NewExamRecord) -> Result<ExamId, StorageError> {
        let mut guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = ExamId::generate();
        let seq = guard.next_seq;
        guard.next_seq += 1;
        guard
            .rows
            .push((seq, exam.data.assign_id(id.clone(), exam.created_at)));
        Ok(id)
    }

    async fn get_exam(&self, id: &ExamId) -> Result<Option<Exam>, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .rows
            .iter()
            .find(|(_, exam)| exam.id() == id)
            .map(|(_, exam)| exam.clone()))
    }

    async fn list_exams(&self) -> Result<Vec<Exam>, StorageError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<&(u64, Exam)> = guard.rows.iter().collect();
        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(rows.into_iter().map(|(_, exam)| exam.clone()).collect())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = ResultId::new(guard.next_id);
        guard.rows.push(StoredResult {
            id,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<StoredResult, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn latest_result_for_exam(
        &self,
        exam_id: &ExamId,
    ) -> Result<Option<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .rows
            .iter()
            .filter(|row| row.result.exam_id() == exam_id)
            .max_by(|a, b| {
                a.result
                    .submitted_at()
                    .cmp(&b.result.submitted_at())
                    .then_with(|| a.id.value().cmp(&b.id.value()))
            })
            .cloned())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard.rows.clone();
        rows.sort_by(|a, b| {
            b.result
                .submitted_at()
                .cmp(&a.result.submitted_at())
                .then_with(|| b.id.value().cmp(&a.id.value()))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn find_account(&self, email: &Email) -> Result<Option<AccountRecord>, StorageError> {
        let guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.rows.get(email).cloned())
    }

    async fn insert_account(&self, account: NewAccountRecord) -> Result<Account, StorageError> {
        let mut guard = self
            .accounts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.rows.contains_key(&account.email) {
            return Err(StorageError::Conflict);
        }
        guard.next_id += 1;
        let created = Account::new(
            AccountId::new(guard.next_id),
            account.email.clone(),
            account.role,
            account.created_at,
        );
        guard.rows.insert(
            account.email,
            AccountRecord {
                account: created.clone(),
                password_hash: account.password_hash,
            },
        );
        Ok(created)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub exams: Arc<dyn ExamRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let exams: Arc<dyn ExamRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo);
        Self {
            exams,
            results,
            accounts,
        }
    }
}
