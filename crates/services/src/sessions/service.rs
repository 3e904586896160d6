use std::fmt;

use exam_core::model::{Exam, Question};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── POLICY & PHASES ───────────────────────────────────────────────────────────
//

/// What a timeout records when an option is selected but never confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// Record "no answer"; only confirmed selections count.
    #[default]
    DiscardSelection,
    /// Record the pending selection as if it had been confirmed.
    KeepSelection,
}

/// Phase of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Timer running, selection changeable.
    Active,
    /// Answer confirmed, feedback visible, waiting for `advance`.
    Locked,
    /// All questions answered or timed out.
    Finished,
}

/// What a single input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Input not valid in the current phase; nothing changed.
    Ignored,
    Selected { option: usize },
    Locked { answer: usize, correct: bool },
    Ticked { time_left: u32 },
    /// Time ran out. `recorded` is what went into the answers.
    TimedOut {
        recorded: Option<usize>,
        finished: bool,
    },
    Advanced { question: usize },
    Finished,
}

/// Feedback shown while a question is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One student's pass through an exam, question by question.
///
/// All input goes through the transition methods; each returns a
/// [`Transition`] and never panics on out-of-phase calls.
#[derive(Clone)]
pub struct ExamSession {
    exam: Exam,
    policy: TimeoutPolicy,
    current: usize,
    time_left: u32,
    selected: Option<usize>,
    phase: SessionPhase,
    answers: Vec<Option<usize>>,
}

impl ExamSession {
    /// Start a session on the first question with the full time budget.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyExam`, `SessionError::ZeroTimeBudget` or
    /// `SessionError::InvalidAnswerKey` if the exam cannot be taken.
    pub fn new(exam: Exam, policy: TimeoutPolicy) -> Result<Self, SessionError> {
        if exam.questions().is_empty() {
            return Err(SessionError::EmptyExam);
        }
        if exam.time_per_question() == 0 {
            return Err(SessionError::ZeroTimeBudget);
        }
        if let Some((question, q)) = exam
            .questions()
            .iter()
            .enumerate()
            .find(|(_, q)| q.correct_answer() >= q.option_count())
        {
            return Err(SessionError::InvalidAnswerKey {
                question,
                index: q.correct_answer(),
                len: q.option_count(),
            });
        }

        let time_left = exam.time_per_question();
        let answers = Vec::with_capacity(exam.question_count());
        Ok(Self {
            exam,
            policy,
            current: 0,
            time_left,
            selected: None,
            phase: SessionPhase::Active,
            answers,
        })
    }

    #[must_use]
    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    #[must_use]
    pub fn policy(&self) -> TimeoutPolicy {
        self.policy
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question on screen, `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == SessionPhase::Finished {
            return None;
        }
        self.exam.questions().get(self.current)
    }

    /// Seconds left on the current question.
    #[must_use]
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Recorded answers so far; exactly one entry per question once finished.
    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.phase == SessionPhase::Locked
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.exam.question_count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.exam.question_count();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_finished(),
        }
    }

    /// Selected and correct option while locked, `None` otherwise.
    #[must_use]
    pub fn feedback(&self) -> Option<AnswerFeedback> {
        if self.phase != SessionPhase::Locked {
            return None;
        }
        let selected = self.selected?;
        let question = self.exam.questions().get(self.current)?;
        Some(AnswerFeedback {
            selected,
            correct_answer: question.correct_answer(),
            is_correct: question.is_correct(Some(selected)),
        })
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Select an option of the current question. The latest selection wins.
    pub fn select_option(&mut self, option: usize) -> Transition {
        if self.phase != SessionPhase::Active {
            return Transition::Ignored;
        }
        let Some(question) = self.exam.questions().get(self.current) else {
            return Transition::Ignored;
        };
        if option >= question.option_count() {
            return Transition::Ignored;
        }
        self.selected = Some(option);
        Transition::Selected { option }
    }

    /// Record the current selection and lock the question.
    pub fn confirm_answer(&mut self) -> Transition {
        if self.phase != SessionPhase::Active {
            return Transition::Ignored;
        }
        let Some(answer) = self.selected else {
            return Transition::Ignored;
        };
        let correct = self
            .exam
            .questions()
            .get(self.current)
            .is_some_and(|q| q.is_correct(Some(answer)));

        self.answers.push(Some(answer));
        self.phase = SessionPhase::Locked;
        Transition::Locked { answer, correct }
    }

    /// One second elapsed on the current question.
    ///
    /// At zero the timeout records an answer per the policy and moves on
    /// without showing feedback.
    pub fn tick(&mut self) -> Transition {
        if self.phase != SessionPhase::Active || self.time_left == 0 {
            return Transition::Ignored;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return Transition::Ticked {
                time_left: self.time_left,
            };
        }

        let recorded = match self.policy {
            TimeoutPolicy::DiscardSelection => None,
            TimeoutPolicy::KeepSelection => self.selected,
        };
        self.answers.push(recorded);

        let finished = self.is_last_question();
        if finished {
            self.finish();
        } else {
            self.next_question();
        }
        Transition::TimedOut { recorded, finished }
    }

    /// Leave a locked question: next question, or finish after the last.
    pub fn advance(&mut self) -> Transition {
        if self.phase != SessionPhase::Locked {
            return Transition::Ignored;
        }
        if self.is_last_question() {
            self.finish();
            return Transition::Finished;
        }
        self.next_question();
        Transition::Advanced {
            question: self.current,
        }
    }

    fn next_question(&mut self) {
        self.current += 1;
        self.time_left = self.exam.time_per_question();
        self.selected = None;
        self.phase = SessionPhase::Active;
    }

    fn finish(&mut self) {
        self.phase = SessionPhase::Finished;
        self.time_left = 0;
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("exam_id", self.exam.id())
            .field("questions_len", &self.exam.question_count())
            .field("current", &self.current)
            .field("time_left", &self.time_left)
            .field("selected", &self.selected)
            .field("phase", &self.phase)
            .field("answers", &self.answers)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{ExamId, ExamSchedule};
    use exam_core::time::fixed_now;
    use proptest::prelude::*;

    fn question(text: &str, correct: usize) -> Question {
        Question::new(
            text,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        )
        .unwrap()
    }

    fn exam_with(seconds: u32, correct: &[usize]) -> Exam {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, c)| question(&format!("Q{}", i + 1), *c))
            .collect();
        Exam::new(
            ExamId::new("math-1").unwrap(),
            "Math Basics - Chapter 1",
            "Mr. Davison",
            ExamSchedule::new("2024-05-01T09:00", "2024-05-01T10:00"),
            seconds,
            questions,
            fixed_now(),
        )
        .unwrap()
    }

    fn session(seconds: u32, correct: &[usize]) -> ExamSession {
        ExamSession::new(exam_with(seconds, correct), TimeoutPolicy::default()).unwrap()
    }

    fn run_out_clock(session: &mut ExamSession) -> Transition {
        let mut last = Transition::Ignored;
        for _ in 0..session.time_left() {
            last = session.tick();
        }
        last
    }

    #[test]
    fn starts_on_first_question_with_full_time() {
        let s = session(30, &[1, 1, 2]);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.time_left(), 30);
        assert_eq!(s.selected(), None);
        assert!(s.answers().is_empty());
        assert_eq!(s.current_question().unwrap().text(), "Q1");
    }

    #[test]
    fn latest_selection_wins() {
        let mut s = session(30, &[1]);
        assert_eq!(s.select_option(0), Transition::Selected { option: 0 });
        assert_eq!(s.select_option(2), Transition::Selected { option: 2 });
        assert_eq!(s.selected(), Some(2));
        assert_eq!(
            s.confirm_answer(),
            Transition::Locked {
                answer: 2,
                correct: false
            }
        );
        assert_eq!(s.answers(), &[Some(2)]);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut s = session(30, &[1]);
        assert_eq!(s.select_option(4), Transition::Ignored);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn confirm_without_selection_is_ignored() {
        let mut s = session(30, &[1]);
        assert_eq!(s.confirm_answer(), Transition::Ignored);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert!(s.answers().is_empty());
    }

    #[test]
    fn locked_question_ignores_input_and_ticks() {
        let mut s = session(30, &[1, 0]);
        s.select_option(1);
        s.confirm_answer();
        assert_eq!(s.select_option(3), Transition::Ignored);
        assert_eq!(s.confirm_answer(), Transition::Ignored);
        assert_eq!(s.tick(), Transition::Ignored);
        assert_eq!(s.time_left(), 30);
        assert_eq!(
            s.feedback(),
            Some(AnswerFeedback {
                selected: 1,
                correct_answer: 1,
                is_correct: true
            })
        );
    }

    #[test]
    fn advance_resets_question_state() {
        let mut s = session(30, &[1, 0]);
        assert_eq!(s.advance(), Transition::Ignored);
        s.select_option(1);
        s.tick();
        s.confirm_answer();
        assert_eq!(s.advance(), Transition::Advanced { question: 1 });
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.time_left(), 30);
        assert_eq!(s.selected(), None);
        assert_eq!(s.feedback(), None);
    }

    #[test]
    fn timeout_discards_pending_selection_by_default() {
        let mut s = session(3, &[1, 0]);
        s.select_option(1);
        assert_eq!(s.tick(), Transition::Ticked { time_left: 2 });
        assert_eq!(s.tick(), Transition::Ticked { time_left: 1 });
        assert_eq!(
            s.tick(),
            Transition::TimedOut {
                recorded: None,
                finished: false
            }
        );
        assert_eq!(s.answers(), &[None]);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.time_left(), 3);
    }

    #[test]
    fn timeout_can_keep_pending_selection() {
        let mut s = ExamSession::new(exam_with(2, &[1]), TimeoutPolicy::KeepSelection).unwrap();
        s.select_option(1);
        s.tick();
        assert_eq!(
            s.tick(),
            Transition::TimedOut {
                recorded: Some(1),
                finished: true
            }
        );
        assert_eq!(s.answers(), &[Some(1)]);
        assert!(s.is_finished());
    }

    #[test]
    fn finished_session_ignores_everything() {
        let mut s = session(1, &[0]);
        assert_eq!(
            s.tick(),
            Transition::TimedOut {
                recorded: None,
                finished: true
            }
        );
        assert_eq!(s.tick(), Transition::Ignored);
        assert_eq!(s.select_option(0), Transition::Ignored);
        assert_eq!(s.confirm_answer(), Transition::Ignored);
        assert_eq!(s.advance(), Transition::Ignored);
        assert_eq!(s.time_left(), 0);
        assert!(s.current_question().is_none());
        assert_eq!(s.answers().len(), 1);
    }

    #[test]
    fn mixed_run_records_answers_in_order() {
        let mut s = session(30, &[1, 1, 2]);

        s.select_option(1);
        assert_eq!(
            s.confirm_answer(),
            Transition::Locked {
                answer: 1,
                correct: true
            }
        );
        s.advance();

        assert!(matches!(
            run_out_clock(&mut s),
            Transition::TimedOut {
                recorded: None,
                finished: false
            }
        ));

        s.select_option(0);
        s.confirm_answer();
        assert_eq!(s.advance(), Transition::Finished);

        assert_eq!(s.answers(), &[Some(1), None, Some(0)]);
        assert_eq!(
            s.progress(),
            SessionProgress {
                total: 3,
                answered: 3,
                remaining: 0,
                is_complete: true
            }
        );
    }

    #[derive(Debug, Clone)]
    enum Input {
        Select(usize),
        Confirm,
        Tick,
        Advance,
    }

    fn input() -> impl Strategy<Value = Input> {
        prop_oneof![
            (0_usize..6).prop_map(Input::Select),
            Just(Input::Confirm),
            Just(Input::Tick),
            Just(Input::Advance),
        ]
    }

    fn policy() -> impl Strategy<Value = TimeoutPolicy> {
        prop_oneof![
            Just(TimeoutPolicy::DiscardSelection),
            Just(TimeoutPolicy::KeepSelection)
        ]
    }

    proptest! {
        #[test]
        fn answers_match_questions_exactly_when_finished(
            inputs in proptest::collection::vec(input(), 0..200),
            seconds in 1_u32..5,
            count in 1_usize..5,
            policy in policy(),
        ) {
            let mut s = ExamSession::new(exam_with(seconds, &vec![0; count]), policy).unwrap();
            for input in inputs {
                let before_question = s.current_index();
                let before_selected = s.selected();
                let before_time = s.time_left();
                let before_answers = s.answers().len();

                let transition = match input {
                    Input::Select(i) => s.select_option(i),
                    Input::Confirm => s.confirm_answer(),
                    Input::Tick => s.tick(),
                    Input::Advance => s.advance(),
                };

                match transition {
                    Transition::Locked { answer, .. } => {
                        prop_assert_eq!(Some(answer), before_selected);
                        prop_assert_eq!(s.answers().last().copied(), Some(Some(answer)));
                    }
                    Transition::TimedOut { recorded, .. } => {
                        prop_assert_eq!(before_time, 1);
                        prop_assert_eq!(s.answers().len(), before_answers + 1);
                        let expected = match policy {
                            TimeoutPolicy::DiscardSelection => None,
                            TimeoutPolicy::KeepSelection => before_selected,
                        };
                        prop_assert_eq!(recorded, expected);
                    }
                    Transition::Ticked { time_left } => {
                        prop_assert_eq!(time_left + 1, before_time);
                        prop_assert_eq!(s.current_index(), before_question);
                    }
                    _ => {}
                }

                prop_assert!(s.answers().len() <= count);
                if s.is_finished() {
                    prop_assert_eq!(s.answers().len(), count);
                }
                prop_assert!(s.time_left() <= seconds);
            }
        }
    }
}
