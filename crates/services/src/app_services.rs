use chrono::Duration;
use std::path::Path;
use std::sync::Arc;

use storage::QuestionBank;
use storage::loader::load_question_bank;
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::catalog::CatalogService;
use crate::error::AppServicesError;
use crate::history::QuizHistoryService;
use crate::quiz::QuizLoopService;
use crate::review::ReviewService;
use crate::session_store::QuizSessionStore;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    quiz_loop: Arc<QuizLoopService>,
    catalog: Arc<CatalogService>,
    history: Arc<QuizHistoryService>,
    review: Arc<ReviewService>,
    sessions: Arc<QuizSessionStore>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, session_ttl: Duration) -> Self {
        let quiz_loop = Arc::new(QuizLoopService::new(clock, storage));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.questions)));
        let history = Arc::new(QuizHistoryService::new(Arc::clone(&storage.results)));
        let review = Arc::new(ReviewService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.review),
        ));
        let sessions = Arc::new(QuizSessionStore::new(clock, session_ttl));

        Self {
            clock,
            quiz_loop,
            catalog,
            history,
            review,
            sessions,
        }
    }

    /// Build services whose results and review list are kept in memory only.
    #[must_use]
    pub fn in_memory(bank: QuestionBank, clock: Clock, session_ttl: Duration) -> Self {
        Self::new(&Storage::in_memory(bank), clock, session_ttl)
    }

    /// Load the question files under `data_dir` and keep results and the
    /// review list in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if no questions can be loaded or storage
    /// initialization fails.
    pub async fn new_sqlite(
        data_dir: &Path,
        db_url: &str,
        clock: Clock,
        session_ttl: Duration,
    ) -> Result<Self, AppServicesError> {
        let (bank, report) = load_question_bank(data_dir)?;
        info!(
            questions = bank.len(),
            skipped = report.skipped(),
            failed_files = report.failed.len(),
            "question bank loaded"
        );
        let storage = Storage::sqlite(db_url, bank).await?;
        Ok(Self::new(&storage, clock, session_ttl))
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn history(&self) -> Arc<QuizHistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn review(&self) -> Arc<ReviewService> {
        Arc::clone(&self.review)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<QuizSessionStore> {
        Arc::clone(&self.sessions)
    }
}
