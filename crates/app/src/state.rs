use std::sync::Arc;
use std::time::{Duration, Instant};

use services::{AppServices, QuizSessionStore};
use tokio::task::JoinHandle;
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub services: AppServices,
    pub secure_cookies: bool,
    started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(services: AppServices, secure_cookies: bool) -> Self {
        Self {
            services,
            secure_cookies,
            started_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Background task that drops expired quizzes every `period`.
pub fn spawn_session_purge(sessions: Arc<QuizSessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired();
            if removed > 0 {
                info!(removed, active = sessions.len(), "expired quiz sessions purged");
            }
        }
    })
}
