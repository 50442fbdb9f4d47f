use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{Department, ExamYear};

/// Unique identifier for a question.
///
/// Row ids in the source files are only unique within one file and one
/// category, so the identifier carries the department and (for specialist
/// questions) the exam year alongside the row number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId {
    department: Department,
    year: Option<ExamYear>,
    number: u32,
}

impl QuestionId {
    /// Creates an id for a 4-1 common question.
    #[must_use]
    pub fn basic(number: u32) -> Self {
        Self {
            department: Department::Basic,
            year: None,
            number,
        }
    }

    /// Creates an id for a 4-2 specialist question.
    #[must_use]
    pub fn specialist(department: Department, year: ExamYear, number: u32) -> Self {
        Self {
            department,
            year: Some(year),
            number,
        }
    }

    #[must_use]
    pub fn department(&self) -> Department {
        self.department
    }

    #[must_use]
    pub fn year(&self) -> Option<ExamYear> {
        self.year
    }

    /// Row id from the source file.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({self})")
    }
}

// ─── Display / FromStr ─────────────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{}-{}-{}", self.department.slug(), year, self.number),
            None => write!(f, "{}-{}", self.department.slug(), self.number),
        }
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse QuestionId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError { raw: s.to_string() };
        let parts: Vec<&str> = s.split('-').collect();
        let department = parts
            .first()
            .and_then(|slug| Department::from_slug(slug))
            .ok_or_else(err)?;

        match (department.is_basic(), parts.as_slice()) {
            (true, [_, number]) => Ok(Self::basic(number.parse().map_err(|_| err())?)),
            (false, [_, year, number]) => Ok(Self::specialist(
                department,
                year.parse().map_err(|_| err())?,
                number.parse().map_err(|_| err())?,
            )),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_department_and_year() {
        let year = ExamYear::new(2015).unwrap();
        assert_eq!(QuestionId::basic(12).to_string(), "basic-12");
        assert_eq!(
            QuestionId::specialist(Department::Road, year, 34).to_string(),
            "road-2015-34"
        );
    }

    #[test]
    fn parses_what_it_prints() {
        let year = ExamYear::new(2019).unwrap();
        let id = QuestionId::specialist(Department::SoilFoundation, year, 7);
        assert_eq!(id.to_string().parse::<QuestionId>().unwrap(), id);
        assert_eq!("basic-3".parse::<QuestionId>().unwrap(), QuestionId::basic(3));
    }

    #[test]
    fn rejects_mismatched_shapes() {
        assert!("basic-2015-3".parse::<QuestionId>().is_err());
        assert!("road-3".parse::<QuestionId>().is_err());
        assert!("road-1999-3".parse::<QuestionId>().is_err());
        assert!("unknown-3".parse::<QuestionId>().is_err());
        assert!("basic-x".parse::<QuestionId>().is_err());
    }

    #[test]
    fn same_row_in_different_years_is_distinct() {
        let a = QuestionId::specialist(Department::Road, ExamYear::new(2014).unwrap(), 1);
        let b = QuestionId::specialist(Department::Road, ExamYear::new(2015).unwrap(), 1);
        assert_ne!(a, b);
    }
}
