use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerRecord, QuizScope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many answers for a single quiz: {len}")]
    TooManyAnswers { len: usize },

    #[error("correct answers ({correct}) exceed total ({total})")]
    CountMismatch { total: u32, correct: u32 },
}

/// Aggregate result of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    scope: QuizScope,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
}

impl QuizSummary {
    /// Rehydrate a quiz summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` or `SummaryError::CountMismatch`
    /// if the stored values are inconsistent.
    pub fn from_persisted(
        scope: QuizScope,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        correct: u32,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if correct > total {
            return Err(SummaryError::CountMismatch { total, correct });
        }

        Ok(Self {
            scope,
            started_at,
            completed_at,
            total,
            correct,
        })
    }

    /// Build a summary from the answers recorded during a quiz.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::TooManyAnswers` if the answer count cannot fit in `u32`.
    pub fn from_answers(
        scope: QuizScope,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        answers: &[AnswerRecord],
    ) -> Result<Self, SummaryError> {
        let total = u32::try_from(answers.len())
            .map_err(|_| SummaryError::TooManyAnswers { len: answers.len() })?;
        let correct = answers.iter().filter(|a| a.is_correct()).count();
        // bounded by `total`
        let correct = u32::try_from(correct).unwrap_or(total);

        Self::from_persisted(scope, started_at, completed_at, total, correct)
    }

    #[must_use]
    pub fn scope(&self) -> QuizScope {
        self.scope
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total - self.correct
    }

    /// Percentage of correct answers, rounded to one decimal place.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round1(f64::from(self.correct) / f64::from(self.total) * 100.0)
    }

    /// Elapsed time in minutes, rounded to one decimal place.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_minutes(&self) -> f64 {
        let secs = (self.completed_at - self.started_at).num_seconds();
        round1(secs as f64 / 60.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
