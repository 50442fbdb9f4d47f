use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use rccm_core::model::{AnswerRecord, Choice, QuestionCount, QuestionId, QuizScope, QuizSummary};

use super::plan::QuizPlan;
use super::progress::QuizProgress;
use crate::error::QuizError;

/// Where the learner is within the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// The current question is shown and has no answer yet.
    AwaitingAnswer,
    /// The current question was answered and its feedback is shown.
    Feedback,
    /// Every question has been answered and the learner moved past the last one.
    Complete,
}

/// What a quiz was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizMode {
    /// Questions sampled from the whole scope.
    #[default]
    Standard,
    /// Questions taken from the review list. Correct answers leave the list.
    Review,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz.
///
/// Steps through the planned questions in order. Each question is answered
/// once, its feedback is shown, and only then does the quiz advance.
#[derive(Clone)]
pub struct QuizSession {
    attempt_key: String,
    mode: QuizMode,
    scope: QuizScope,
    requested: QuestionCount,
    question_ids: Vec<QuestionId>,
    cursor: usize,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result_id: Option<i64>,
}

impl QuizSession {
    /// Create a session from a plan.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the plan selected no questions.
    pub fn new(plan: QuizPlan, started_at: DateTime<Utc>) -> Result<Self, QuizError> {
        if plan.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            attempt_key: Uuid::new_v4().simple().to_string(),
            mode: QuizMode::Standard,
            scope: plan.scope,
            requested: plan.requested,
            question_ids: plan.question_ids,
            cursor: 0,
            answers: Vec::new(),
            started_at,
            completed_at: None,
            result_id: None,
        })
    }

    #[must_use]
    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    /// Identifies this run of the quiz when its result is stored.
    #[must_use]
    pub fn attempt_key(&self) -> &str {
        &self.attempt_key
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn scope(&self) -> QuizScope {
        self.scope
    }

    #[must_use]
    pub fn requested(&self) -> QuestionCount {
        self.requested
    }

    #[must_use]
    pub fn question_ids(&self) -> &[QuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn result_id(&self) -> Option<i64> {
        self.result_id
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.question_ids.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.completed_at.is_some() {
            QuizPhase::Complete
        } else if self.answers.len() > self.cursor {
            QuizPhase::Feedback
        } else {
            QuizPhase::AwaitingAnswer
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Question being shown, or `None` once the quiz is complete.
    #[must_use]
    pub fn current_question_id(&self) -> Option<QuestionId> {
        self.question_ids.get(self.cursor).copied()
    }

    /// Answer to the current question while its feedback is shown.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerRecord> {
        match self.phase() {
            QuizPhase::Feedback => self.answers.get(self.cursor),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total_questions();
        QuizProgress {
            total,
            answered: self.answers.len(),
            remaining: total.saturating_sub(self.answers.len()),
            current_number: (self.cursor + 1).min(total),
            is_complete: self.is_complete(),
        }
    }

    /// Record the answer to the current question and show its feedback.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` once the quiz is finished, or
    /// `QuizError::NotAwaitingAnswer` if the current question was already answered.
    pub fn submit_answer(
        &mut self,
        chosen: Choice,
        correct: Choice,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnswerRecord, QuizError> {
        match self.phase() {
            QuizPhase::Complete => return Err(QuizError::Completed),
            QuizPhase::Feedback => return Err(QuizError::NotAwaitingAnswer),
            QuizPhase::AwaitingAnswer => {}
        }
        let question_id = self.current_question_id().ok_or(QuizError::Completed)?;

        self.answers
            .push(AnswerRecord::new(question_id, chosen, correct, answered_at));
        self.answers.last().ok_or(QuizError::Completed)
    }

    /// Move past the answered question.
    ///
    /// Completes the quiz at `at` when the last question is left behind.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` once the quiz is finished, or
    /// `QuizError::NotInFeedback` if the current question has no answer yet.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<QuizPhase, QuizError> {
        match self.phase() {
            QuizPhase::Complete => return Err(QuizError::Completed),
            QuizPhase::AwaitingAnswer => return Err(QuizError::NotInFeedback),
            QuizPhase::Feedback => {}
        }

        self.cursor += 1;
        if self.cursor >= self.question_ids.len() {
            self.completed_at = Some(at);
        }
        Ok(self.phase())
    }

    /// Aggregate result of a completed quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotComplete` while the quiz is running.
    pub fn summary(&self) -> Result<QuizSummary, QuizError> {
        let completed_at = self.completed_at.ok_or(QuizError::NotComplete)?;
        Ok(QuizSummary::from_answers(
            self.scope,
            self.started_at,
            completed_at,
            &self.answers,
        )?)
    }

    pub(crate) fn set_result_id(&mut self, id: i64) {
        self.result_id = Some(id);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("attempt_key", &self.attempt_key)
            .field("mode", &self.mode)
            .field("scope", &self.scope)
            .field("questions_len", &self.question_ids.len())
            .field("cursor", &self.cursor)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
