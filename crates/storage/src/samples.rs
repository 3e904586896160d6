//! Sample exams used to populate a fresh database.

use chrono::{DateTime, Duration, Utc};
use exam_core::model::{ExamDraft, QuestionDraft};

const SCHEDULE_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn question(text: &str, options: [&str; 4], correct_answer: i64) -> QuestionDraft {
    QuestionDraft {
        text: text.into(),
        options: options.iter().map(ToString::to_string).collect(),
        correct_answer,
    }
}

fn window(now: DateTime<Utc>, start: Duration, end: Duration) -> (String, String) {
    (
        (now + start).format(SCHEDULE_FORMAT).to_string(),
        (now + end).format(SCHEDULE_FORMAT).to_string(),
    )
}

/// Three exams relative to `now`: two open, one upcoming.
#[must_use]
pub fn sample_drafts(now: DateTime<Utc>) -> Vec<ExamDraft> {
    let (math_start, math_end) = window(now, Duration::hours(-1), Duration::days(7));
    let (science_start, science_end) = window(now, Duration::days(-1), Duration::days(3));
    let (history_start, history_end) = window(now, Duration::days(2), Duration::days(9));

    vec![
        ExamDraft {
            title: "Math Basics - Chapter 1".into(),
            teacher: "Mr. Davison".into(),
            start_time: math_start,
            end_time: math_end,
            time_per_question: 30,
            questions: vec![
                question("What is 2 + 2?", ["3", "4", "5", "6"], 1),
                question("What is 5 x 3?", ["12", "15", "18", "20"], 1),
                question("What is 10 - 7?", ["1", "2", "3", "4"], 2),
            ],
        },
        ExamDraft {
            title: "Science: The Solar System".into(),
            teacher: "Ms. Frizzle".into(),
            start_time: science_start,
            end_time: science_end,
            time_per_question: 45,
            questions: vec![
                question(
                    "Which planet is closest to the Sun?",
                    ["Venus", "Mercury", "Mars", "Earth"],
                    1,
                ),
                question(
                    "Which planet has the most prominent rings?",
                    ["Jupiter", "Uranus", "Saturn", "Neptune"],
                    2,
                ),
            ],
        },
        ExamDraft {
            title: "History: Ancient Civilizations".into(),
            teacher: "Mr. Jones".into(),
            start_time: history_start,
            end_time: history_end,
            time_per_question: 60,
            questions: vec![question(
                "Where were the pyramids of Giza built?",
                ["Greece", "Mesopotamia", "Egypt", "Persia"],
                2,
            )],
        },
    ]
}
