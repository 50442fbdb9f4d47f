//! Shared error types for the services crate.

use thiserror::Error;

use rccm_core::model::{AnswerError, ExamYear, QuestionId, SummaryError, YearError};
use storage::loader::CsvLoadError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while running a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for this quiz")]
    Empty,
    #[error("quiz already completed")]
    Completed,
    #[error("quiz is not finished yet")]
    NotComplete,
    #[error("current question already answered")]
    NotAwaitingAnswer,
    #[error("current question has not been answered yet")]
    NotInFeedback,
    #[error(transparent)]
    InvalidAnswer(#[from] AnswerError),
    #[error("question {0} is missing from the question bank")]
    QuestionMissing(QuestionId),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown department: {0:?}")]
    UnknownDepartment(String),
    #[error(transparent)]
    Year(#[from] YearError),
    #[error("no questions for exam year {0}")]
    NoDataForYear(ExamYear),
    #[error("no questions available for {0}")]
    NoQuestions(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Load(#[from] CsvLoadError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
