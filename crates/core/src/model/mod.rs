mod answer;
mod attempt;
mod department;
mod ids;
mod question;
mod summary;
mod year;

pub use answer::{AnswerError, Choice};
pub use attempt::{AnswerRecord, CountError, QuestionCount, QuizScope};
pub use department::{Department, QuestionKind};
pub use ids::{ParseIdError, QuestionId};
pub use question::{Question, QuestionError};
pub use summary::{QuizSummary, SummaryError};
pub use year::{ExamYear, YearError};
