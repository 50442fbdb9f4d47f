use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{Choice, Department, ExamYear, QuestionId};

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountError {
    #[error("question count must be 10, 20 or 30, got {0:?}")]
    Unsupported(String),
}

/// Number of questions in one quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionCount {
    #[default]
    Ten,
    Twenty,
    Thirty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 3] = [
        QuestionCount::Ten,
        QuestionCount::Twenty,
        QuestionCount::Thirty,
    ];

    #[must_use]
    pub fn get(self) -> usize {
        match self {
            QuestionCount::Ten => 10,
            QuestionCount::Twenty => 20,
            QuestionCount::Thirty => 30,
        }
    }

    /// # Errors
    ///
    /// Returns `CountError::Unsupported` for any value other than 10, 20 or 30.
    pub fn from_value(value: usize) -> Result<Self, CountError> {
        match value {
            10 => Ok(QuestionCount::Ten),
            20 => Ok(QuestionCount::Twenty),
            30 => Ok(QuestionCount::Thirty),
            other => Err(CountError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for QuestionCount {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<usize>()
            .map_err(|_| CountError::Unsupported(trimmed.to_string()))
            .and_then(Self::from_value)
    }
}

//
// ─── SCOPE ─────────────────────────────────────────────────────────────────────
//

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizScope {
    pub department: Department,
    /// `None` means every year. Always `None` for basic questions.
    pub year: Option<ExamYear>,
}

impl QuizScope {
    #[must_use]
    pub fn department(department: Department) -> Self {
        Self {
            department,
            year: None,
        }
    }

    /// Basic questions have no year, so a year is dropped for them.
    #[must_use]
    pub fn department_year(department: Department, year: ExamYear) -> Self {
        Self {
            department,
            year: if department.is_basic() { None } else { Some(year) },
        }
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        id.department() == self.department && self.year.is_none_or(|y| id.year() == Some(y))
    }

    /// Human-readable label, e.g. `道路（2015年度）`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{}（{}年度）", self.department.name(), year),
            None => self.department.name().to_string(),
        }
    }
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// A single answered question within a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chosen: Choice,
    pub correct: Choice,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        chosen: Choice,
        correct: Choice,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id,
            chosen,
            correct,
            answered_at,
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}
