//! Application state shared across handlers

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    auth::AdminAuth, pages::AdminDashboard, rate_limiter::RateLimiter,
    repositories::Repositories,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repositories: Repositories,
    pub dashboard: AdminDashboard,
    pub auth: AdminAuth,
    pub login_limiter: RateLimiter,
    /// Source of "today" for the calendar
    pub clock: Arc<dyn Fn() -> NaiveDate + Send + Sync>,
}

impl AppState {
    pub fn new(repositories: Repositories, auth: AdminAuth, login_limiter: RateLimiter) -> Self {
        Self {
            dashboard: AdminDashboard::new(repositories.clone()),
            repositories,
            auth,
            login_limiter,
            clock: Arc::new(common::calendar::today),
        }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}
