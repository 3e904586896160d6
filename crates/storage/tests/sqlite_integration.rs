use chrono::Duration;
use exam_core::model::{Email, ExamDraft, ExamId, ExamResult, QuestionDraft, QuestionOutcome, Role};
use exam_core::time::fixed_now;
use storage::repository::{
    AccountRepository, ExamRepository, NewAccountRecord, NewExamRecord, ResultRepository,
    StorageError,
};
use storage::sqlite::SqliteRepository;

fn draft(title: &str) -> ExamDraft {
    ExamDraft {
        title: title.into(),
        teacher: "Mr. Davison".into(),
        start_time: "2024-05-01T09:00".into(),
        end_time: "2024-05-01T10:00".into(),
        time_per_question: 30,
        questions: vec![
            QuestionDraft {
                text: "What is 2 + 2?".into(),
                options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
                correct_answer: 1,
            },
            QuestionDraft {
                text: "What is 5 x 3?".into(),
                options: vec!["12".into(), "15".into(), "18".into(), "20".into()],
                correct_answer: 1,
            },
            QuestionDraft {
                text: "What is 10 - 7?".into(),
                options: vec!["1".into(), "2".into(), "3".into(), "4".into()],
                correct_answer: 2,
            },
        ],
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_exam_round_trip_keeps_questions() {
    let repo = connect("memdb_exam_roundtrip").await;

    let id = repo
        .insert_exam(NewExamRecord {
            data: draft("Math Basics").validate().unwrap(),
            created_at: fixed_now(),
        })
        .await
        .expect("insert");

    let exam = repo.get_exam(&id).await.expect("fetch").expect("present");
    assert_eq!(exam.id(), &id);
    assert_eq!(exam.title(), "Math Basics");
    assert_eq!(exam.time_per_question(), 30);
    assert_eq!(exam.question_count(), 3);
    assert_eq!(exam.questions()[2].correct_answer(), 2);
    assert_eq!(exam.questions()[1].options().len(), 4);
    assert_eq!(exam.created_at(), fixed_now());

    let missing = ExamId::new("missing").unwrap();
    assert!(repo.get_exam(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_lists_newest_first_and_skips_malformed_documents() {
    let repo = connect("memdb_exam_listing").await;
    let now = fixed_now();

    let older = repo
        .insert_exam(NewExamRecord {
            data: draft("Older").validate().unwrap(),
            created_at: now - Duration::days(1),
        })
        .await
        .unwrap();
    let first = repo
        .insert_exam(NewExamRecord {
            data: draft("First").validate().unwrap(),
            created_at: now,
        })
        .await
        .unwrap();
    let second = repo
        .insert_exam(NewExamRecord {
            data: draft("Second").validate().unwrap(),
            created_at: now,
        })
        .await
        .unwrap();

    sqlx::query("INSERT INTO exams (id, document, created_at) VALUES (?1, ?2, ?3)")
        .bind("broken")
        .bind(r#"{"title":"Broken","questions":[]}"#)
        .bind(now + Duration::days(1))
        .execute(repo.pool())
        .await
        .unwrap();

    let ids: Vec<ExamId> = repo
        .list_exams()
        .await
        .unwrap()
        .iter()
        .map(|exam| exam.id().clone())
        .collect();
    assert_eq!(ids, vec![second, first, older]);

    let broken = ExamId::new("broken").unwrap();
    let err = repo.get_exam(&broken).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_results_round_trip_with_unanswered() {
    let repo = connect("memdb_results").await;
    let id = repo
        .insert_exam(NewExamRecord {
            data: draft("Math Basics").validate().unwrap(),
            created_at: fixed_now(),
        })
        .await
        .unwrap();
    let exam = repo.get_exam(&id).await.unwrap().unwrap();

    let early = ExamResult::grade(&exam, &[Some(0), Some(0), Some(0)], fixed_now()).unwrap();
    let late = ExamResult::grade(
        &exam,
        &[Some(1), None, Some(0)],
        fixed_now() + Duration::minutes(10),
    )
    .unwrap();
    repo.append_result(&early).await.unwrap();
    let late_id = repo.append_result(&late).await.unwrap();

    let stored = repo.get_result(late_id).await.unwrap();
    assert_eq!(stored.result, late);
    assert_eq!(stored.result.answers(), &[Some(1), None, Some(0)]);
    assert_eq!(
        stored.result.outcomes(),
        &[
            QuestionOutcome::Correct,
            QuestionOutcome::Unanswered,
            QuestionOutcome::Incorrect
        ]
    );

    let latest = repo.latest_result_for_exam(&id).await.unwrap().unwrap();
    assert_eq!(latest.id, late_id);
    assert_eq!(latest.result.correct(), 1);
    assert_eq!(latest.result.total(), 3);

    let recent = repo.list_results(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, late_id);

    let missing = repo
        .get_result(exam_core::model::ResultId::new(999))
        .await
        .unwrap_err();
    assert!(matches!(missing, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_accounts_are_unique_by_email() {
    let repo = connect("memdb_accounts").await;
    let email = Email::parse("Teacher@School.org").unwrap();
    let record = NewAccountRecord {
        email: email.clone(),
        role: Role::Teacher,
        password_hash: "salt$digest".into(),
        created_at: fixed_now(),
    };

    let account = repo.insert_account(record.clone()).await.unwrap();
    assert_eq!(account.role(), Role::Teacher);

    let found = repo.find_account(&email).await.unwrap().unwrap();
    assert_eq!(found.account, account);
    assert_eq!(found.password_hash, "salt$digest");

    let err = repo.insert_account(record).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let stranger = Email::parse("nobody@school.org").unwrap();
    assert!(repo.find_account(&stranger).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_loads_documents_without_teacher() {
    let repo = connect("memdb_exam_no_teacher").await;
    sqlx::query("INSERT INTO exams (id, document, created_at) VALUES (?1, ?2, ?3)")
        .bind("legacy")
        .bind(
            serde_json::json!({
                "title": "Science: The Solar System",
                "startTime": "2023-11-14T09:00",
                "endTime": "2023-11-15T09:00",
                "timePerQuestion": 45,
                "questions": [{
                    "text": "Which planet is largest?",
                    "options": ["Mars", "Jupiter", "Venus", "Earth"],
                    "correctAnswer": 1
                }],
                "createdAt": "2023-11-14T22:13:20Z"
            })
            .to_string(),
        )
        .bind(fixed_now())
        .execute(repo.pool())
        .await
        .unwrap();

    let listed = repo.list_exams().await.unwrap();
    assert_eq!(listed.len(), 1);

    let exam = repo
        .get_exam(&ExamId::new("legacy").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exam.teacher(), "");
    assert_eq!(exam.questions()[0].correct_answer(), 1);
}
