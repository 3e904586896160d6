use chrono::{DateTime, Utc};
use exam_core::model::{
    Account, AccountId, Email, ExamId, ExamResult, QuestionOutcome, ResultId, Role,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{AccountRecord, OutcomeDocument, StorageError, StoredResult};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

pub(crate) fn result_id_from_i64(v: i64) -> Result<ResultId, StorageError> {
    Ok(ResultId::new(i64_to_u64("result_id", v)?))
}

pub(crate) fn result_id_to_i64(id: ResultId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("result_id overflow".into()))
}

pub(crate) fn account_id_from_i64(v: i64) -> Result<AccountId, StorageError> {
    Ok(AccountId::new(i64_to_u64("account_id", v)?))
}

pub(crate) fn exam_id_from_str(v: String) -> Result<ExamId, StorageError> {
    ExamId::new(v).map_err(ser)
}

pub(crate) fn answers_to_json(answers: &[Option<usize>]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn outcomes_to_json(outcomes: &[QuestionOutcome]) -> Result<String, StorageError> {
    let docs: Vec<OutcomeDocument> = outcomes.iter().copied().map(Into::into).collect();
    serde_json::to_string(&docs).map_err(ser)
}

pub(crate) fn map_result_row(row: &SqliteRow) -> Result<StoredResult, StorageError> {
    let answers: Vec<Option<usize>> =
        serde_json::from_str(&row.try_get::<String, _>("answers").map_err(ser)?).map_err(ser)?;
    let outcomes: Vec<OutcomeDocument> =
        serde_json::from_str(&row.try_get::<String, _>("outcomes").map_err(ser)?).map_err(ser)?;
    let submitted_at: DateTime<Utc> = row.try_get("submitted_at").map_err(ser)?;

    let result = ExamResult::from_persisted(
        exam_id_from_str(row.try_get("exam_id").map_err(ser)?)?,
        row.try_get("exam_title").map_err(ser)?,
        answers,
        outcomes.into_iter().map(Into::into).collect(),
        i64_to_u32("correct", row.try_get("correct").map_err(ser)?)?,
        i64_to_u32("total", row.try_get("total").map_err(ser)?)?,
        submitted_at,
    )
    .map_err(ser)?;

    Ok(StoredResult {
        id: result_id_from_i64(row.try_get("id").map_err(ser)?)?,
        result,
    })
}

pub(crate) fn map_account_row(row: &SqliteRow) -> Result<AccountRecord, StorageError> {
    let email = Email::parse(&row.try_get::<String, _>("email").map_err(ser)?).map_err(ser)?;
    let role: Role = row
        .try_get::<String, _>("role")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let account = Account::new(
        account_id_from_i64(row.try_get("id").map_err(ser)?)?,
        email,
        role,
        row.try_get("created_at").map_err(ser)?,
    );
    Ok(AccountRecord {
        account,
        password_hash: row.try_get("password_hash").map_err(ser)?,
    })
}
