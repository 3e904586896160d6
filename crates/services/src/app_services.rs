use std::sync::Arc;

use exam_core::model::{ExamDraft, ExamId};
use storage::repository::Storage;
use storage::samples::sample_drafts;

use crate::Clock;
use crate::auth_service::AuthService;
use crate::builder_service::ExamBuilderService;
use crate::error::{AppServicesError, ExamBuilderError};
use crate::exam_service::ExamService;
use crate::sessions::{ExamAttemptService, ResultService, TimeoutPolicy};

/// Assembles app-facing services over one storage backend.
///
/// Built once by the binary and passed down; there is no global client.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    exams: Arc<ExamService>,
    builder: Arc<ExamBuilderService>,
    attempts: Arc<ExamAttemptService>,
    results: Arc<ResultService>,
    auth: Arc<AuthService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        policy: TimeoutPolicy,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, policy))
    }

    /// Build services over in-memory storage.
    #[must_use]
    pub fn in_memory(clock: Clock, policy: TimeoutPolicy) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, policy)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, policy: TimeoutPolicy) -> Self {
        let exams = Arc::new(ExamService::new(clock, Arc::clone(&storage.exams)));
        let builder = Arc::new(ExamBuilderService::new(Arc::clone(&exams)));
        let attempts = Arc::new(
            ExamAttemptService::new(
                clock,
                Arc::clone(&storage.exams),
                Arc::clone(&storage.results),
            )
            .with_timeout_policy(policy),
        );
        let results = Arc::new(ResultService::new(Arc::clone(&storage.results)));
        let auth = Arc::new(AuthService::new(clock, Arc::clone(&storage.accounts)));

        Self {
            clock,
            exams,
            builder,
            attempts,
            results,
            auth,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamService> {
        Arc::clone(&self.exams)
    }

    #[must_use]
    pub fn builder(&self) -> Arc<ExamBuilderService> {
        Arc::clone(&self.builder)
    }

    #[must_use]
    pub fn attempts(&self) -> Arc<ExamAttemptService> {
        Arc::clone(&self.attempts)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    /// Submit the bundled sample exams through the builder.
    ///
    /// # Errors
    ///
    /// Returns the first `ExamBuilderError` encountered.
    pub async fn seed_samples(&self) -> Result<Vec<(ExamId, ExamDraft)>, ExamBuilderError> {
        let mut seeded = Vec::new();
        for draft in sample_drafts(self.clock.now()) {
            let id = self.builder.submit(&draft).await?;
            seeded.push((id, draft));
        }
        Ok(seeded)
    }
}
