use std::time::Duration;

use exam_core::model::ExamId;
use services::{
    ExamAttemptService, ExamSession, SessionPhase, SubmittedAttempt, TimedSession, Transition,
};

use crate::state::ViewError;
use crate::vm::time_fmt::format_seconds_remaining;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    Select(usize),
    Confirm,
    /// "Next Question" or "Finish Exam", depending on position.
    Continue,
}

/// Visual state of one option button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    /// Locked and this is the right answer (selected or not).
    Correct,
    /// Locked and this wrong option was the selection.
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimaryAction {
    ConfirmAnswer { enabled: bool },
    NextQuestion,
    FinishExam,
}

impl PrimaryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::ConfirmAnswer { .. } => "Confirm Answer",
            PrimaryAction::NextQuestion => "Next Question",
            PrimaryAction::FinishExam => "Finish Exam",
        }
    }

    #[must_use]
    pub fn enabled(self) -> bool {
        match self {
            PrimaryAction::ConfirmAnswer { enabled } => enabled,
            PrimaryAction::NextQuestion | PrimaryAction::FinishExam => true,
        }
    }

    #[must_use]
    pub fn intent(self) -> ExamIntent {
        match self {
            PrimaryAction::ConfirmAnswer { .. } => ExamIntent::Confirm,
            PrimaryAction::NextQuestion | PrimaryAction::FinishExam => ExamIntent::Continue,
        }
    }
}

/// Everything the exam screen shows for the current question.
#[derive(Clone, Debug, PartialEq)]
pub struct ExamScreenVm {
    pub title: String,
    pub created_by: String,
    pub question_label: String,
    pub question_text: String,
    pub time_left: u32,
    pub time_label: String,
    /// Remaining time as a share of the budget, `0.0..=100.0`.
    pub timer_percent: f64,
    /// Questions already recorded, as a share of the exam.
    pub progress_percent: f64,
    pub options: Vec<OptionVm>,
    /// Verdict line while the question is locked.
    pub feedback: Option<String>,
    pub primary: PrimaryAction,
}

impl ExamScreenVm {
    /// Build the screen for the current question; `None` once finished.
    #[must_use]
    pub fn from_session(session: &ExamSession) -> Option<Self> {
        let exam = session.exam();
        let question = session.current_question()?;
        let locked = session.phase() == SessionPhase::Locked;
        let selected = session.selected();

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let is_selected = selected == Some(index);
                let state = match (locked, is_selected) {
                    (true, _) if index == question.correct_answer() => OptionState::Correct,
                    (true, true) => OptionState::Wrong,
                    (false, true) => OptionState::Selected,
                    _ => OptionState::Idle,
                };
                OptionVm {
                    index,
                    text: text.clone(),
                    state,
                }
            })
            .collect();

        let primary = if !locked {
            PrimaryAction::ConfirmAnswer {
                enabled: selected.is_some(),
            }
        } else if session.is_last_question() {
            PrimaryAction::FinishExam
        } else {
            PrimaryAction::NextQuestion
        };

        let feedback = session.feedback().map(|fb| {
            if fb.is_correct {
                "Correct!".to_owned()
            } else {
                let answer = question
                    .options()
                    .get(fb.correct_answer)
                    .map_or("", String::as_str);
                format!("Incorrect. The right answer is \"{answer}\".")
            }
        });

        let budget = exam.time_per_question();
        Some(Self {
            title: exam.title().to_owned(),
            created_by: format!("Created by {}", exam.teacher()),
            question_label: format!(
                "Question {} / {}",
                session.current_index() + 1,
                exam.question_count()
            ),
            question_text: question.text().to_owned(),
            time_left: session.time_left(),
            time_label: format_seconds_remaining(session.time_left()),
            timer_percent: f64::from(session.time_left()) / f64::from(budget.max(1)) * 100.0,
            progress_percent: session.progress().fraction() * 100.0,
            options,
            feedback,
            primary,
        })
    }
}

/// Drives a timed exam from screen intents.
pub struct ExamVm {
    timed: TimedSession,
}

impl ExamVm {
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(session: ExamSession, tick_period: Duration) -> Self {
        Self {
            timed: TimedSession::start(session, tick_period),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Option<ExamScreenVm> {
        ExamScreenVm::from_session(self.timed.session())
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        self.timed.session()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timed.session().is_finished()
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timed.is_timer_running()
    }

    pub fn apply(&mut self, intent: ExamIntent) -> Transition {
        match intent {
            ExamIntent::Select(option) => self.timed.select_option(option),
            ExamIntent::Confirm => self.timed.confirm_answer(),
            ExamIntent::Continue => self.timed.advance(),
        }
    }

    /// Wait for and apply the next timer tick; `None` while no timer runs.
    pub async fn next_tick(&mut self) -> Option<Transition> {
        self.timed.next_tick().await
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the attempt cannot be graded or saved.
    /// The session is kept, so the caller may retry.
    pub async fn submit(
        &self,
        attempts: &ExamAttemptService,
    ) -> Result<SubmittedAttempt, ViewError> {
        attempts
            .submit(self.timed.session())
            .await
            .map_err(|err| ViewError::from(&err))
    }
}

/// # Errors
///
/// Returns `ViewError::ExamNotFound`, `ViewError::NotYetOpen` or
/// `ViewError::Closed` when the exam cannot be taken now, and
/// `ViewError::Unknown` for other failures.
pub async fn start_exam(
    attempts: &ExamAttemptService,
    exam_id: &ExamId,
    tick_period: Duration,
) -> Result<ExamVm, ViewError> {
    let session = attempts
        .start_attempt(exam_id)
        .await
        .map_err(|err| ViewError::from(&err))?;
    Ok(ExamVm::new(session, tick_period))
}
