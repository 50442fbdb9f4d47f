#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod history;
pub mod quiz;
pub mod review;
pub mod session_store;

pub use rccm_core::Clock;

pub use app_services::AppServices;
pub use catalog::CatalogService;
pub use error::{AppServicesError, CatalogError, QuizError};
pub use history::{DepartmentStats, QuizHistory, QuizHistoryItem, QuizHistoryService};
pub use quiz::{
    AnswerFeedback, AnsweredQuestion, QuizLoopService, QuizMode, QuizPhase, QuizProgress,
    QuizSession, QuizStep,
};
pub use review::{ReviewDepartment, ReviewEntry, ReviewList, ReviewService};
pub use session_store::{DEFAULT_SESSION_TTL_SECS, QuizSessionStore, SessionKey, StoredQuiz};
pub use storage::bank::{Catalog, DepartmentCount, YearEntry};
