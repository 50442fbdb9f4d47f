use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rccm_core::model::{Department, Question, QuestionId, QuizScope, QuizSummary};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::bank::{Catalog, QuestionBank};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to the question bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch a question by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_question(&self, id: QuestionId) -> Result<Question, StorageError>;

    /// Ids of every question inside the scope.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_questions(&self, scope: QuizScope) -> Result<Vec<QuestionId>, StorageError>;

    /// Departments, years and question counts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn catalog(&self) -> Result<Catalog, StorageError>;
}

/// Persisted quiz result plus its storage id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultRow {
    pub id: i64,
    pub summary: QuizSummary,
}

impl QuizResultRow {
    #[must_use]
    pub fn new(id: i64, summary: QuizSummary) -> Self {
        Self { id, summary }
    }
}

/// Repository contract for completed quiz results.
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    /// Persist a completed quiz and return its id.
    ///
    /// `attempt_key` identifies the quiz run. Appending the same key again
    /// stores nothing and returns the id of the first row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(
        &self,
        attempt_key: &str,
        summary: &QuizSummary,
    ) -> Result<i64, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: i64) -> Result<QuizSummary, StorageError>;

    /// Most recently completed results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if results cannot be read.
    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizResultRow>, StorageError>;

    /// Most recently completed results for one department, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if results cannot be read.
    async fn list_by_department(
        &self,
        department: Department,
        limit: u32,
    ) -> Result<Vec<QuizResultRow>, StorageError>;
}

/// A question queued for another try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub question_id: QuestionId,
    /// Times the question was answered wrongly while listed. Zero for bookmarks.
    pub miss_count: u32,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewItem {
    fn new(question_id: QuestionId, miss_count: u32, at: DateTime<Utc>) -> Self {
        Self {
            question_id,
            miss_count,
            added_at: at,
            updated_at: at,
        }
    }
}

/// Repository contract for the review list.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Add each question to the list, or bump its miss count if listed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be written.
    async fn record_misses(
        &self,
        ids: &[QuestionId],
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Add a question without counting a miss. Returns `false` if already listed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be written.
    async fn bookmark(&self, id: QuestionId, at: DateTime<Utc>) -> Result<bool, StorageError>;

    /// Drop a question from the list. Returns `false` if it was not listed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be written.
    async fn remove_review(&self, id: QuestionId) -> Result<bool, StorageError>;

    /// Every listed question, most missed first, then most recently touched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read.
    async fn list_review(&self) -> Result<Vec<ReviewItem>, StorageError>;
}

#[derive(Default)]
struct MemoryState {
    results: Vec<QuizResultRow>,
    attempts: HashMap<String, i64>,
    review: BTreeMap<QuestionId, ReviewItem>,
}

/// Simple in-memory result store and review list for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn newest_first<'a>(
        rows: impl Iterator<Item = &'a QuizResultRow>,
        limit: u32,
    ) -> Vec<QuizResultRow> {
        let mut rows: Vec<QuizResultRow> = rows.cloned().collect();
        rows.sort_by(|a, b| {
            b.summary
                .completed_at()
                .cmp(&a.summary.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        rows
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryRepository {
    async fn append_result(
        &self,
        attempt_key: &str,
        summary: &QuizSummary,
    ) -> Result<i64, StorageError> {
        let mut guard = self.lock()?;
        if let Some(id) = guard.attempts.get(attempt_key) {
            return Ok(*id);
        }
        let id = i64::try_from(guard.results.len())
            .map_err(|_| StorageError::Serialization("result id overflow".into()))?
            + 1;
        guard.results.push(QuizResultRow::new(id, summary.clone()));
        guard.attempts.insert(attempt_key.to_string(), id);
        Ok(id)
    }

    async fn get_result(&self, id: i64) -> Result<QuizSummary, StorageError> {
        let guard = self.lock()?;
        guard
            .results
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.summary.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizResultRow>, StorageError> {
        let guard = self.lock()?;
        Ok(Self::newest_first(guard.results.iter(), limit))
    }

    async fn list_by_department(
        &self,
        department: Department,
        limit: u32,
    ) -> Result<Vec<QuizResultRow>, StorageError> {
        let guard = self.lock()?;
        Ok(Self::newest_first(
            guard
                .results
                .iter()
                .filter(|row| row.summary.scope().department == department),
            limit,
        ))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    async fn record_misses(
        &self,
        ids: &[QuestionId],
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for id in ids {
            guard
                .review
                .entry(*id)
                .and_modify(|item| {
                    item.miss_count += 1;
                    item.updated_at = at;
                })
                .or_insert_with(|| ReviewItem::new(*id, 1, at));
        }
        Ok(())
    }

    async fn bookmark(&self, id: QuestionId, at: DateTime<Utc>) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        if guard.review.contains_key(&id) {
            return Ok(false);
        }
        guard.review.insert(id, ReviewItem::new(id, 0, at));
        Ok(true)
    }

    async fn remove_review(&self, id: QuestionId) -> Result<bool, StorageError> {
        Ok(self.lock()?.review.remove(&id).is_some())
    }

    async fn list_review(&self) -> Result<Vec<ReviewItem>, StorageError> {
        let guard = self.lock()?;
        let mut items: Vec<ReviewItem> = guard.review.values().cloned().collect();
        items.sort_by(|a, b| {
            b.miss_count
                .cmp(&a.miss_count)
                .then(b.updated_at.cmp(&a.updated_at))
                .then(a.question_id.cmp(&b.question_id))
        });
        Ok(items)
    }
}

/// Aggregates the question bank, result store and review list behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn QuizResultRepository>,
    pub review: Arc<dyn ReviewRepository>,
}

impl Storage {
    /// Results and the review list are kept in memory and lost on restart.
    #[must_use]
    pub fn in_memory(bank: QuestionBank) -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(bank);
        let results: Arc<dyn QuizResultRepository> = Arc::new(repo.clone());
        let review: Arc<dyn ReviewRepository> = Arc::new(repo);
        Self {
            questions,
            results,
            review,
        }
    }
}
