use std::sync::Arc;

use exam_core::model::{ExamDraft, ExamId, QuestionDraft};
use exam_core::time::fixed_now;
use services::{AppServices, Clock, ExamAttemptService, SessionError, TimeoutPolicy, Transition};
use storage::repository::{InMemoryRepository, ResultRepository};

fn draft(start: &str, end: &str) -> ExamDraft {
    let q = |text: &str, options: [&str; 4], correct| QuestionDraft {
        text: text.into(),
        options: options.iter().map(ToString::to_string).collect(),
        correct_answer: correct,
    };
    ExamDraft {
        title: "Math Basics - Chapter 1".into(),
        teacher: "Mr. Davison".into(),
        start_time: start.into(),
        end_time: end.into(),
        time_per_question: 30,
        questions: vec![
            q("What is 2 + 2?", ["3", "4", "5", "6"], 1),
            q("What is 5 x 3?", ["12", "15", "18", "20"], 1),
            q("What is 10 - 7?", ["1", "2", "3", "4"], 2),
        ],
    }
}

fn open_draft() -> ExamDraft {
    draft("2023-11-14T09:00", "2023-11-15T09:00")
}

#[tokio::test]
async fn builder_to_session_keeps_question_shape() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), TimeoutPolicy::default());
    let id = services.builder().submit(&open_draft()).await.unwrap();

    let listed = services.exams().list_exams().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), &id);

    let session = services.attempts().start_attempt(&id).await.unwrap();
    assert_eq!(session.exam().question_count(), 3);
    assert!(
        session
            .exam()
            .questions()
            .iter()
            .all(|q| q.option_count() == 4)
    );
    assert_eq!(session.time_left(), 30);
}

#[tokio::test]
async fn mixed_attempt_scores_one_of_three() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), TimeoutPolicy::default());
    let id = services.builder().submit(&open_draft()).await.unwrap();
    let attempts = services.attempts();
    let mut session = attempts.start_attempt(&id).await.unwrap();

    // Q1: correct.
    session.select_option(1);
    session.confirm_answer();
    assert!(matches!(
        attempts.submit(&session).await,
        Err(SessionError::NotFinished)
    ));
    session.advance();

    // Q2: pick something, never confirm, let the clock run out.
    session.select_option(3);
    let mut last = Transition::Ignored;
    while session.current_index() == 1 {
        last = session.tick();
    }
    assert_eq!(
        last,
        Transition::TimedOut {
            recorded: None,
            finished: false
        }
    );

    // Q3: wrong.
    session.select_option(0);
    session.confirm_answer();
    assert_eq!(session.advance(), Transition::Finished);

    let submitted = attempts.submit(&session).await.unwrap();
    assert_eq!(submitted.result.answers(), &[Some(1), None, Some(0)]);
    assert_eq!(submitted.result.correct(), 1);
    assert_eq!(submitted.result.total(), 3);

    let latest = services
        .results()
        .latest_for_exam(&id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, submitted.result_id);
    assert_eq!(latest.result, submitted.result);
}

#[tokio::test]
async fn keep_selection_policy_counts_pending_choice() {
    let services = AppServices::in_memory(
        Clock::fixed(fixed_now()),
        TimeoutPolicy::KeepSelection,
    );
    let id = services.builder().submit(&open_draft()).await.unwrap();
    let mut session = services.attempts().start_attempt(&id).await.unwrap();

    for (index, correct) in [1, 1, 2].into_iter().enumerate() {
        session.select_option(correct);
        while session.current_index() == index && !session.is_finished() {
            session.tick();
        }
    }

    assert!(session.is_finished());
    let submitted = services.attempts().submit(&session).await.unwrap();
    assert_eq!(submitted.result.correct(), 3);
}

#[tokio::test]
async fn start_attempt_respects_schedule_and_existence() {
    let repo = InMemoryRepository::new();
    let now = fixed_now();
    let services = AppServices::from_storage(
        &storage::repository::Storage {
            exams: Arc::new(repo.clone()),
            results: Arc::new(repo.clone()),
            accounts: Arc::new(repo.clone()),
        },
        Clock::fixed(now),
        TimeoutPolicy::default(),
    );

    let upcoming = services
        .builder()
        .submit(&draft("2023-11-20T09:00", "2023-11-21T09:00"))
        .await
        .unwrap();
    let closed = services
        .builder()
        .submit(&draft("2023-11-01T09:00", "2023-11-02T09:00"))
        .await
        .unwrap();

    let attempts: Arc<ExamAttemptService> = services.attempts();
    assert!(matches!(
        attempts.start_attempt(&upcoming).await,
        Err(SessionError::NotYetOpen)
    ));
    assert!(matches!(
        attempts.start_attempt(&closed).await,
        Err(SessionError::Closed)
    ));
    assert!(matches!(
        attempts
            .start_attempt(&ExamId::new("missing").unwrap())
            .await,
        Err(SessionError::ExamNotFound)
    ));

    assert!(repo.list_results(10).await.unwrap().is_empty());
}
