use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YearError {
    #[error("unsupported exam year: {0}")]
    Unsupported(i64),
    #[error("exam year is not a number: {0}")]
    NotANumber(String),
}

/// Exam year of a specialist question file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExamYear(u16);

impl ExamYear {
    pub const FIRST: u16 = 2008;
    pub const LAST: u16 = 2019;

    /// Creates a year inside the supported range.
    ///
    /// # Errors
    ///
    /// Returns `YearError::Unsupported` outside `FIRST..=LAST`.
    pub fn new(year: i64) -> Result<Self, YearError> {
        u16::try_from(year)
            .ok()
            .filter(|y| (Self::FIRST..=Self::LAST).contains(y))
            .map(Self)
            .ok_or(YearError::Unsupported(year))
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// All supported years, oldest first.
    pub fn supported() -> impl Iterator<Item = ExamYear> {
        (Self::FIRST..=Self::LAST).map(ExamYear)
    }
}

impl fmt::Debug for ExamYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExamYear({})", self.0)
    }
}

impl fmt::Display for ExamYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExamYear {
    type Err = YearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let year = trimmed
            .parse::<i64>()
            .map_err(|_| YearError::NotANumber(trimmed.to_string()))?;
        Self::new(year)
    }
}
