use std::collections::HashSet;
use std::sync::Arc;

use rccm_core::model::{
    AnswerRecord, Choice, Department, Question, QuestionCount, QuestionId, QuizScope,
};
use storage::repository::{
    QuestionRepository, QuizResultRepository, ReviewRepository, Storage, StorageError,
};
use tracing::{info, warn};

use super::plan::{QuizBuilder, QuizPlan};
use super::progress::QuizProgress;
use super::session::{QuizMode, QuizPhase, QuizSession};
use crate::Clock;
use crate::error::QuizError;

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question: Question,
    pub record: AnswerRecord,
    pub progress: QuizProgress,
}

impl AnswerFeedback {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.record.is_correct()
    }

    /// True when moving on finishes the quiz.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.progress.current_number >= self.progress.total
    }
}

/// Where the quiz stands after moving past a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Next(QuizProgress),
    /// `result_id` is `None` if persisting the result failed; retry with
    /// [`QuizLoopService::finalize_result`].
    Complete { result_id: Option<i64> },
}

/// One answered question with its full text, for result review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: Question,
    pub record: AnswerRecord,
}

/// Orchestrates quiz start, grading, result persistence and review-list upkeep.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn QuizResultRepository>,
    review: Arc<dyn ReviewRepository>,
    shuffle: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, storage: &Storage) -> Self {
        Self {
            clock,
            questions: Arc::clone(&storage.questions),
            results: Arc::clone(&storage.results),
            review: Arc::clone(&storage.review),
            shuffle: true,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    async fn load(&self, id: QuestionId) -> Result<Question, QuizError> {
        match self.questions.get_question(id).await {
            Ok(question) => Ok(question),
            Err(StorageError::NotFound) => Err(QuizError::QuestionMissing(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Start a new quiz drawing up to `count` questions from `scope`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the scope holds no questions, or
    /// `QuizError::Storage` if the bank cannot be read.
    pub async fn start_quiz(
        &self,
        scope: QuizScope,
        count: QuestionCount,
    ) -> Result<QuizSession, QuizError> {
        let candidates = self.questions.list_questions(scope).await?;
        let plan = QuizBuilder::new(scope, count)
            .with_shuffle(self.shuffle)
            .build(candidates);
        self.open(plan, QuizMode::Standard)
    }

    /// Start a quiz over the review-list questions of one department.
    ///
    /// Listed questions that are no longer in the bank are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if nothing of `department` is listed, or
    /// `QuizError::Storage` if the list or the bank cannot be read.
    pub async fn start_review(
        &self,
        department: Department,
        count: QuestionCount,
    ) -> Result<QuizSession, QuizError> {
        let scope = QuizScope::department(department);
        let known: HashSet<QuestionId> =
            self.questions.list_questions(scope).await?.into_iter().collect();
        let listed = self
            .review
            .list_review()
            .await?
            .into_iter()
            .map(|item| item.question_id)
            .filter(|id| known.contains(id));
        let plan = QuizBuilder::new(scope, count)
            .with_shuffle(self.shuffle)
            .build(listed);
        self.open(plan, QuizMode::Review)
    }

    fn open(&self, plan: QuizPlan, mode: QuizMode) -> Result<QuizSession, QuizError> {
        let scope = plan.scope;
        if plan.is_short() && !plan.is_empty() {
            warn!(
                scope = %scope.label(),
                requested = plan.requested.get(),
                available = plan.available,
                "fewer questions than requested"
            );
        }

        let session = QuizSession::new(plan, self.clock.now())?.with_mode(mode);
        info!(
            scope = %scope.label(),
            ?mode,
            questions = session.total_questions(),
            "quiz started"
        );
        Ok(session)
    }

    /// The question currently shown, or `None` once the quiz is complete.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionMissing` if the bank no longer holds it.
    pub async fn current(&self, session: &QuizSession) -> Result<Option<Question>, QuizError> {
        match session.current_question_id() {
            Some(id) => self.load(id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Feedback for the current question if it has been answered.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionMissing` if the bank no longer holds it.
    pub async fn feedback(
        &self,
        session: &QuizSession,
    ) -> Result<Option<AnswerFeedback>, QuizError> {
        let Some(record) = session.current_answer().cloned() else {
            return Ok(None);
        };
        let question = self.load(record.question_id).await?;
        Ok(Some(AnswerFeedback {
            question,
            record,
            progress: session.progress(),
        }))
    }

    /// Grade a submitted answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidAnswer` if `raw_answer` is not a choice,
    /// `QuizError::Completed` or `QuizError::NotAwaitingAnswer` if the quiz
    /// is not waiting for an answer.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        raw_answer: &str,
    ) -> Result<AnswerFeedback, QuizError> {
        match session.phase() {
            QuizPhase::Complete => return Err(QuizError::Completed),
            QuizPhase::Feedback => return Err(QuizError::NotAwaitingAnswer),
            QuizPhase::AwaitingAnswer => {}
        }

        let chosen = Choice::normalize(raw_answer)?;
        let question = self
            .current(session)
            .await?
            .ok_or(QuizError::Completed)?;

        let record = session
            .submit_answer(chosen, question.correct(), self.clock.now())?
            .clone();

        Ok(AnswerFeedback {
            question,
            record,
            progress: session.progress(),
        })
    }

    /// Move past the answered question, persisting the result once the quiz completes.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotInFeedback` if the current question is unanswered,
    /// or `QuizError::Completed` if the quiz already finished.
    pub async fn next(&self, session: &mut QuizSession) -> Result<QuizStep, QuizError> {
        match session.advance(self.clock.now())? {
            QuizPhase::Complete => {
                let result_id = match self.finalize_result(session).await {
                    Ok(id) => Some(id),
                    Err(err) => {
                        warn!(%err, "failed to persist quiz result");
                        None
                    }
                };
                Ok(QuizStep::Complete { result_id })
            }
            QuizPhase::AwaitingAnswer | QuizPhase::Feedback => {
                Ok(QuizStep::Next(session.progress()))
            }
        }
    }

    /// Persist the result of a completed quiz if that has not happened yet.
    ///
    /// The result is keyed by the session's attempt key, so a repeated call
    /// for the same quiz returns the stored id. On first save, wrongly
    /// answered questions join the review list, and in a review quiz the
    /// correctly answered ones leave it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotComplete` if the quiz is still running.
    /// Returns `QuizError::Storage` if persistence fails.
    pub async fn finalize_result(&self, session: &mut QuizSession) -> Result<i64, QuizError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }

        let summary = session.summary()?;
        let id = self
            .results
            .append_result(session.attempt_key(), &summary)
            .await?;
        session.set_result_id(id);
        info!(
            result_id = id,
            scope = %summary.scope().label(),
            correct = summary.correct(),
            total = summary.total(),
            "quiz result saved"
        );

        if let Err(err) = self.update_review(session).await {
            warn!(%err, result_id = id, "review list not updated");
        }
        Ok(id)
    }

    async fn update_review(&self, session: &QuizSession) -> Result<(), StorageError> {
        let at = session.completed_at().unwrap_or_else(|| self.clock.now());
        let (missed, solved): (Vec<&AnswerRecord>, Vec<&AnswerRecord>) =
            session.answers().iter().partition(|a| !a.is_correct());

        if !missed.is_empty() {
            let ids: Vec<QuestionId> = missed.iter().map(|a| a.question_id).collect();
            self.review.record_misses(&ids, at).await?;
        }
        if session.mode() == QuizMode::Review {
            for record in solved {
                self.review.remove_review(record.question_id).await?;
            }
        }
        Ok(())
    }

    /// Every answered question with its text, in the order asked.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::QuestionMissing` if a question left the bank.
    pub async fn answered_questions(
        &self,
        session: &QuizSession,
    ) -> Result<Vec<AnsweredQuestion>, QuizError> {
        let mut out = Vec::with_capacity(session.answers().len());
        for record in session.answers() {
            out.push(AnsweredQuestion {
                question: self.load(record.question_id).await?,
                record: record.clone(),
            });
        }
        Ok(out)
    }
}
