mod plan;
mod progress;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use plan::{QuizBuilder, QuizPlan};
pub use progress::QuizProgress;
pub use session::{QuizMode, QuizPhase, QuizSession};
pub use workflow::{AnswerFeedback, AnsweredQuestion, QuizLoopService, QuizStep};
