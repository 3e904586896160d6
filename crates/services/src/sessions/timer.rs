use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::service::{ExamSession, SessionPhase, Transition};

/// Default tick period: one second per `tick()`.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

struct ArmedTimer {
    question: usize,
    handle: JoinHandle<()>,
}

impl Drop for ArmedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An [`ExamSession`] driven by a per-question Tokio timer.
///
/// At most one timer task exists, armed only while the current question is
/// `Active`. Every transition re-synchronises the timer before returning, so
/// a tick armed for question N can never reach question N+1.
pub struct TimedSession {
    session: ExamSession,
    period: Duration,
    ticks_tx: mpsc::UnboundedSender<usize>,
    ticks_rx: mpsc::UnboundedReceiver<usize>,
    timer: Option<ArmedTimer>,
}

impl TimedSession {
    /// Wrap `session` and arm the timer for its first question.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(session: ExamSession, period: Duration) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        let mut timed = Self {
            session,
            period,
            ticks_tx,
            ticks_rx,
            timer: None,
        };
        timed.resync();
        timed
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    /// Stop the timer and hand back the session.
    #[must_use]
    pub fn into_session(mut self) -> ExamSession {
        self.disarm();
        self.session
    }

    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn select_option(&mut self, option: usize) -> Transition {
        let transition = self.session.select_option(option);
        self.resync();
        transition
    }

    pub fn confirm_answer(&mut self) -> Transition {
        let transition = self.session.confirm_answer();
        self.resync();
        transition
    }

    pub fn advance(&mut self) -> Transition {
        let transition = self.session.advance();
        self.resync();
        transition
    }

    /// Wait for the next tick of the current question and apply it.
    ///
    /// Returns `None` right away when no timer is running. Cancel safe, so it
    /// can sit in a `tokio::select!` next to user input.
    pub async fn next_tick(&mut self) -> Option<Transition> {
        loop {
            let expected = self.timer.as_ref()?.question;
            let question = self.ticks_rx.recv().await?;
            if question != expected {
                tracing::debug!(question, expected, "dropping stale tick");
                continue;
            }
            let transition = self.session.tick();
            self.resync();
            return Some(transition);
        }
    }

    fn resync(&mut self) {
        let wanted = (self.session.phase() == SessionPhase::Active)
            .then(|| self.session.current_index());
        if let (Some(armed), Some(question)) = (&self.timer, wanted) {
            if armed.question == question {
                return;
            }
        }
        self.disarm();
        if let Some(question) = wanted {
            self.arm(question);
        }
    }

    fn arm(&mut self, question: usize) {
        let tx = self.ticks_tx.clone();
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(question).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(question, period_ms = period.as_millis(), "question timer armed");
        self.timer = Some(ArmedTimer { question, handle });
    }

    fn disarm(&mut self) {
        if let Some(armed) = self.timer.take() {
            tracing::debug!(question = armed.question, "question timer cancelled");
            drop(armed);
        }
        while self.ticks_rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::TimeoutPolicy;
    use exam_core::model::{Exam, ExamId, ExamSchedule, Question};
    use exam_core::time::fixed_now;

    fn session(seconds: u32, correct: &[usize]) -> ExamSession {
        let questions = correct
            .iter()
            .map(|c| {
                Question::new(
                    "Q",
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    *c,
                )
                .unwrap()
            })
            .collect();
        let exam = Exam::new(
            ExamId::new("timed").unwrap(),
            "Timed",
            "Mr. Davison",
            ExamSchedule::new("", ""),
            seconds,
            questions,
            fixed_now(),
        )
        .unwrap();
        ExamSession::new(exam, TimeoutPolicy::DiscardSelection).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_count_down_then_time_out() {
        let mut timed = TimedSession::start(session(2, &[1, 0]), DEFAULT_TICK_PERIOD);
        assert!(timed.is_timer_running());

        let started = Instant::now();
        assert_eq!(
            timed.next_tick().await,
            Some(Transition::Ticked { time_left: 1 })
        );
        assert_eq!(
            timed.next_tick().await,
            Some(Transition::TimedOut {
                recorded: None,
                finished: false
            })
        );
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(timed.session().current_index(), 1);
        assert_eq!(timed.session().time_left(), 2);
        assert!(timed.is_timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn locking_stops_the_timer() {
        let mut timed = TimedSession::start(session(30, &[1, 0]), DEFAULT_TICK_PERIOD);
        timed.select_option(1);
        assert!(timed.is_timer_running());
        timed.confirm_answer();
        assert!(!timed.is_timer_running());
        assert_eq!(timed.next_tick().await, None);
        assert_eq!(timed.session().time_left(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_ticks_do_not_leak_into_next_question() {
        let mut timed = TimedSession::start(session(30, &[1, 0]), DEFAULT_TICK_PERIOD);

        tokio::time::advance(Duration::from_millis(2_500)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        timed.select_option(1);
        timed.confirm_answer();
        assert_eq!(timed.advance(), Transition::Advanced { question: 1 });

        let armed_at = Instant::now();
        assert_eq!(
            timed.next_tick().await,
            Some(Transition::Ticked { time_left: 29 })
        );
        assert_eq!(armed_at.elapsed(), DEFAULT_TICK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_by_timeout_disarms() {
        let mut timed = TimedSession::start(session(1, &[0]), Duration::from_millis(200));
        assert_eq!(
            timed.next_tick().await,
            Some(Transition::TimedOut {
                recorded: None,
                finished: true
            })
        );
        assert!(!timed.is_timer_running());
        assert_eq!(timed.next_tick().await, None);

        let session = timed.into_session();
        assert_eq!(session.answers(), &[None]);
    }
}
