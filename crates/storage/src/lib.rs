#![forbid(unsafe_code)]

pub mod bank;
pub mod loader;
pub mod repository;
pub mod sqlite;

pub use bank::{Catalog, DepartmentCount, QuestionBank, YearEntry};
pub use loader::{CsvLoadError, LoadReport, load_question_bank};
pub use repository::{QuizResultRow, ReviewItem, ReviewRepository, Storage, StorageError};
