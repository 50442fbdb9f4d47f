use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("answer is empty")]
    Empty,
    #[error("invalid answer: {0:?}")]
    Invalid(String),
}

//
// ─── CHOICE ───────────────────────────────────────────────────────────────────
//

/// One of the four options of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Choice::A => 'A',
            Choice::B => 'B',
            Choice::C => 'C',
            Choice::D => 'D',
        }
    }

    /// Zero-based position of the option.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Choice::A => 0,
            Choice::B => 1,
            Choice::C => 2,
            Choice::D => 3,
        }
    }

    /// Interpret a submitted or stored answer value.
    ///
    /// Accepts `A`-`D` in either case, the digits `1`-`4`, and the full-width
    /// letters `Ａ`-`Ｄ`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::Empty` for blank input and `AnswerError::Invalid`
    /// for anything else that is not one of the accepted forms.
    pub fn normalize(raw: &str) -> Result<Self, AnswerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AnswerError::Empty);
        }

        let mut chars = trimmed.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(AnswerError::Invalid(trimmed.to_string()));
        };

        match c {
            'A' | 'a' | '1' | 'Ａ' | 'ａ' => Ok(Choice::A),
            'B' | 'b' | '2' | 'Ｂ' | 'ｂ' => Ok(Choice::B),
            'C' | 'c' | '3' | 'Ｃ' | 'ｃ' => Ok(Choice::C),
            'D' | 'd' | '4' | 'Ｄ' | 'ｄ' => Ok(Choice::D),
            _ => Err(AnswerError::Invalid(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Choice {
    type Err = AnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}
