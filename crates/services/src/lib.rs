#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod builder_service;
pub mod error;
pub mod exam_service;
pub mod sessions;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, SignIn};
pub use builder_service::ExamBuilderService;
pub use error::{AppServicesError, AuthError, ExamBuilderError, ExamServiceError, SessionError};
pub use exam_service::ExamService;

pub use sessions::{
    AnswerFeedback, DEFAULT_TICK_PERIOD, ExamAttemptService, ExamSession, ResultListItem,
    ResultService, SessionPhase, SessionProgress, SubmittedAttempt, TimedSession, TimeoutPolicy,
    Transition,
};
