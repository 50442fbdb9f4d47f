use thiserror::Error;

use crate::model::{Choice, Department, ExamYear, QuestionId, QuestionKind};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {0} cannot be empty")]
    EmptyOption(Choice),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

const DEFAULT_DIFFICULTY: &str = "標準";

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; 4],
    correct: Choice,
    explanation: String,
    reference: String,
    difficulty: String,
    keywords: String,
}

impl Question {
    /// Creates a question, trimming the text and options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank, or
    /// `QuestionError::EmptyOption` if any of the four options is blank.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; 4],
        correct: Choice,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options = options.map(|o| o.trim().to_string());
        if let Some(choice) = Choice::ALL
            .into_iter()
            .find(|c| options[c.index()].is_empty())
        {
            return Err(QuestionError::EmptyOption(choice));
        }

        Ok(Self {
            id,
            text,
            options,
            correct,
            explanation: String::new(),
            reference: String::new(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            keywords: String::new(),
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into().trim().to_string();
        self
    }

    /// Blank values keep the default label.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        let difficulty = difficulty.into().trim().to_string();
        if !difficulty.is_empty() {
            self.difficulty = difficulty;
        }
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into().trim().to_string();
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn department(&self) -> Department {
        self.id.department()
    }

    #[must_use]
    pub fn year(&self) -> Option<ExamYear> {
        self.id.year()
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.department().kind()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn option(&self, choice: Choice) -> &str {
        &self.options[choice.index()]
    }

    /// Options paired with their choice letter, in A-D order.
    pub fn options(&self) -> impl Iterator<Item = (Choice, &str)> {
        Choice::ALL
            .into_iter()
            .map(|c| (c, self.options[c.index()].as_str()))
    }

    #[must_use]
    pub fn correct(&self) -> Choice {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, choice: Choice) -> bool {
        self.correct == choice
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn keywords(&self) -> &str {
        &self.keywords
    }
}
