mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AnswerFeedback, ExamSession, SessionPhase, TimeoutPolicy, Transition};
pub use timer::{DEFAULT_TICK_PERIOD, TimedSession};
pub use view::{ResultListItem, ResultService};
pub use workflow::{ExamAttemptService, SubmittedAttempt};
