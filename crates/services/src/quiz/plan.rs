use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use rccm_core::model::{QuestionCount, QuestionId, QuizScope};

/// Selection result for a quiz build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPlan {
    pub scope: QuizScope,
    pub requested: QuestionCount,
    pub question_ids: Vec<QuestionId>,
    /// Questions the scope held before sampling.
    pub available: usize,
}

impl QuizPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.question_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }

    /// True when the scope held fewer questions than requested.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.total() < self.requested.get()
    }
}

/// Picks the questions of one quiz from a scope.
pub struct QuizBuilder {
    scope: QuizScope,
    count: QuestionCount,
    shuffle: bool,
}

impl QuizBuilder {
    #[must_use]
    pub fn new(scope: QuizScope, count: QuestionCount) -> Self {
        Self {
            scope,
            count,
            shuffle: true,
        }
    }

    /// Disable shuffling to take the lowest ids in order.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sample `min(count, available)` distinct questions from `candidates`.
    ///
    /// Candidates outside the scope are ignored and duplicates collapse.
    pub fn build(self, candidates: impl IntoIterator<Item = QuestionId>) -> QuizPlan {
        let mut seen = HashSet::new();
        let mut pool: Vec<QuestionId> = candidates
            .into_iter()
            .filter(|id| self.scope.contains(*id) && seen.insert(*id))
            .collect();
        let available = pool.len();

        if self.shuffle {
            let mut rng = rng();
            pool.as_mut_slice().shuffle(&mut rng);
        } else {
            pool.sort_unstable();
        }
        pool.truncate(self.count.get());

        QuizPlan {
            scope: self.scope,
            requested: self.count,
            question_ids: pool,
            available,
        }
    }
}
