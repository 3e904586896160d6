use chrono::{DateTime, Utc};
use exam_core::model::{Availability, Exam, ExamId};
use services::{ExamService, ResultListItem, ResultService};

use crate::routes::Route;
use crate::state::ViewError;
use crate::vm::time_fmt::{format_datetime, format_window};

//
// ─── STUDENT ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentExamStatus {
    Available,
    Completed { correct: u32, total: u32 },
    Upcoming,
    Closed,
}

impl StudentExamStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StudentExamStatus::Available => "available",
            StudentExamStatus::Completed { .. } => "completed",
            StudentExamStatus::Upcoming => "upcoming",
            StudentExamStatus::Closed => "closed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentExamCardVm {
    pub exam_id: ExamId,
    pub title: String,
    pub created_by: String,
    pub questions_label: String,
    pub status: StudentExamStatus,
    pub score_label: Option<String>,
    /// Where the card's button leads, if it has one.
    pub action: Option<Route>,
}

/// A taken exam shows as completed; otherwise its window decides.
#[must_use]
pub fn student_status(
    exam: &Exam,
    latest: Option<&ResultListItem>,
    now: DateTime<Utc>,
) -> StudentExamStatus {
    if let Some(result) = latest {
        return StudentExamStatus::Completed {
            correct: result.correct,
            total: result.total,
        };
    }
    match exam.schedule().availability(now) {
        Availability::Open => StudentExamStatus::Available,
        Availability::Upcoming => StudentExamStatus::Upcoming,
        Availability::Closed => StudentExamStatus::Closed,
    }
}

fn questions_label(count: usize) -> String {
    if count == 1 {
        "1 question".to_owned()
    } else {
        format!("{count} questions")
    }
}

/// `results` may hold several attempts per exam; the newest one counts.
#[must_use]
pub fn map_student_dashboard(
    exams: &[Exam],
    results: &[ResultListItem],
    now: DateTime<Utc>,
) -> Vec<StudentExamCardVm> {
    exams
        .iter()
        .map(|exam| {
            let latest = results
                .iter()
                .filter(|r| &r.exam_id == exam.id())
                .max_by_key(|r| (r.submitted_at, r.id));
            let status = student_status(exam, latest, now);
            let action = match status {
                StudentExamStatus::Available => Some(Route::TakeExam {
                    exam_id: exam.id().clone(),
                }),
                StudentExamStatus::Completed { .. } => Some(Route::Results {
                    exam_id: exam.id().clone(),
                }),
                StudentExamStatus::Upcoming | StudentExamStatus::Closed => None,
            };
            let score_label = match status {
                StudentExamStatus::Completed { correct, total } => {
                    Some(format!("Score: {correct}/{total}"))
                }
                _ => None,
            };
            StudentExamCardVm {
                exam_id: exam.id().clone(),
                title: exam.title().to_owned(),
                created_by: format!("Created by {}", exam.teacher()),
                questions_label: questions_label(exam.question_count()),
                status,
                score_label,
                action,
            }
        })
        .collect()
}

/// # Errors
///
/// Returns `ViewError::Unknown` if exams or results cannot be loaded.
pub async fn load_student_dashboard(
    exams: &ExamService,
    results: &ResultService,
    now: DateTime<Utc>,
) -> Result<Vec<StudentExamCardVm>, ViewError> {
    let exams = exams
        .list_exams()
        .await
        .map_err(|err| ViewError::from(&err))?;
    let mut latest = Vec::new();
    for exam in &exams {
        if let Some(stored) = results
            .latest_for_exam(exam.id())
            .await
            .map_err(|err| ViewError::from(&err))?
        {
            latest.push(ResultListItem::from_stored(&stored));
        }
    }
    Ok(map_student_dashboard(&exams, &latest, now))
}

//
// ─── TEACHER ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeacherExamRowVm {
    pub exam_id: ExamId,
    pub title: String,
    pub questions_label: String,
    pub window_label: String,
    pub seconds_per_question: u32,
    pub created_at_str: String,
}

impl From<&Exam> for TeacherExamRowVm {
    fn from(exam: &Exam) -> Self {
        Self {
            exam_id: exam.id().clone(),
            title: exam.title().to_owned(),
            questions_label: questions_label(exam.question_count()),
            window_label: format_window(exam.schedule().start_time(), exam.schedule().end_time()),
            seconds_per_question: exam.time_per_question(),
            created_at_str: format_datetime(exam.created_at()),
        }
    }
}

/// Rows keep the store order (most recent first).
#[must_use]
pub fn map_teacher_dashboard(exams: &[Exam]) -> Vec<TeacherExamRowVm> {
    exams.iter().map(TeacherExamRowVm::from).collect()
}
