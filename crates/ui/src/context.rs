use std::sync::{Arc, RwLock};
use std::time::Duration;

use exam_core::model::Account;
use services::{
    AppServices, AuthService, Clock, ExamAttemptService, ExamBuilderService, ExamService,
    ResultService,
};

use crate::routes::Route;

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;

    fn exams(&self) -> Arc<ExamService>;
    fn builder(&self) -> Arc<ExamBuilderService>;
    fn attempts(&self) -> Arc<ExamAttemptService>;
    fn results(&self) -> Arc<ResultService>;
    fn auth(&self) -> Arc<AuthService>;
}

impl UiApp for AppServices {
    fn clock(&self) -> Clock {
        AppServices::clock(self)
    }

    fn exams(&self) -> Arc<ExamService> {
        AppServices::exams(self)
    }

    fn builder(&self) -> Arc<ExamBuilderService> {
        AppServices::builder(self)
    }

    fn attempts(&self) -> Arc<ExamAttemptService> {
        AppServices::attempts(self)
    }

    fn results(&self) -> Arc<ResultService> {
        AppServices::results(self)
    }

    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }
}

/// Services and signed-in account shared by every screen.
#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    tick_period: Duration,
    signed_in: Arc<RwLock<Option<Account>>>,

    exams: Arc<ExamService>,
    builder: Arc<ExamBuilderService>,
    attempts: Arc<ExamAttemptService>,
    results: Arc<ResultService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &dyn UiApp, tick_period: Duration) -> Self {
        Self {
            clock: app.clock(),
            tick_period,
            signed_in: Arc::new(RwLock::new(None)),
            exams: app.exams(),
            builder: app.builder(),
            attempts: app.attempts(),
            results: app.results(),
            auth: app.auth(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Remember `account` and return its landing route.
    pub fn sign_in(&self, account: Account) -> Route {
        let landing = Route::dashboard_for(account.role());
        if let Ok(mut slot) = self.signed_in.write() {
            *slot = Some(account);
        }
        landing
    }

    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.signed_in.write() {
            *slot = None;
        }
    }

    #[must_use]
    pub fn account(&self) -> Option<Account> {
        self.signed_in.read().ok().and_then(|slot| slot.clone())
    }

    /// Where navigating to `route` actually lands.
    ///
    /// Signed-out users go to login; a route for the other role falls back
    /// to the account's own dashboard.
    #[must_use]
    pub fn resolve(&self, route: Route) -> Route {
        let Some(required) = route.required_role() else {
            return route;
        };
        match self.account() {
            None => Route::Login,
            Some(account) if account.role() == required => route,
            Some(account) => Route::dashboard_for(account.role()),
        }
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
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &dyn UiApp, tick_period: Duration) -> AppContext {
    AppContext::new(app, tick_period)
}
