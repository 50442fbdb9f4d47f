//! The review list: questions answered wrongly, plus ones bookmarked by hand.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use rccm_core::model::{Department, Question, QuestionId};
use storage::repository::{QuestionRepository, ReviewItem, ReviewRepository, StorageError};
use tracing::{debug, info};

use crate::Clock;

/// A listed question with its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub question: Question,
    pub miss_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// How many listed questions belong to one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDepartment {
    pub department: Department,
    pub questions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewList {
    pub entries: Vec<ReviewEntry>,
    /// Departments in catalog order, only those with listed questions.
    pub departments: Vec<ReviewDepartment>,
}

impl ReviewList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads and edits the review list.
#[derive(Clone)]
pub struct ReviewService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    review: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        review: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            review,
        }
    }

    async fn entry(&self, item: ReviewItem) -> Result<Option<ReviewEntry>, StorageError> {
        match self.questions.get_question(item.question_id).await {
            Ok(question) => Ok(Some(ReviewEntry {
                question,
                miss_count: item.miss_count,
                updated_at: item.updated_at,
            })),
            Err(StorageError::NotFound) => {
                debug!(id = %item.question_id, "listed question left the bank");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Listed questions still in the bank, most missed first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list or the bank cannot be read.
    pub async fn list(&self) -> Result<ReviewList, StorageError> {
        let mut entries = Vec::new();
        for item in self.review.list_review().await? {
            if let Some(entry) = self.entry(item).await? {
                entries.push(entry);
            }
        }

        let departments = Department::ALL
            .into_iter()
            .filter_map(|department| {
                let questions = entries
                    .iter()
                    .filter(|e| e.question.department() == department)
                    .count();
                (questions > 0).then_some(ReviewDepartment {
                    department,
                    questions,
                })
            })
            .collect();

        Ok(ReviewList {
            entries,
            departments,
        })
    }

    /// Put a question on the list by hand. Returns `false` if already listed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bank has no such question.
    pub async fn bookmark(&self, id: QuestionId) -> Result<bool, StorageError> {
        self.questions.get_question(id).await?;
        let added = self.review.bookmark(id, self.clock.now()).await?;
        if added {
            info!(%id, "question bookmarked for review");
        }
        Ok(added)
    }

    /// Take a question off the list. Returns `false` if it was not listed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be written.
    pub async fn remove(&self, id: QuestionId) -> Result<bool, StorageError> {
        let removed = self.review.remove_review(id).await?;
        if removed {
            info!(%id, "question removed from review list");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rccm_core::model::{Choice, ExamYear};
    use rccm_core::time::fixed_now;
    use storage::QuestionBank;
    use storage::repository::InMemoryRepository;

    fn road(n: u32) -> QuestionId {
        QuestionId::specialist(Department::Road, ExamYear::new(2015).unwrap(), n)
    }

    fn service() -> (ReviewService, InMemoryRepository) {
        let ids = [QuestionId::basic(1), QuestionId::basic(2), road(1)];
        let bank = QuestionBank::from_questions(ids.into_iter().map(|id| {
            let options = ["a", "b", "c", "d"].map(String::from);
            Question::new(id, format!("Q {id}"), options, Choice::A).unwrap()
        }))
        .unwrap();
        let repo = InMemoryRepository::new();
        let svc = ReviewService::new(
            Clock::fixed(fixed_now()),
            Arc::new(bank),
            Arc::new(repo.clone()),
        );
        (svc, repo)
    }

    #[tokio::test]
    async fn list_groups_by_department_and_skips_unknown_questions() {
        let (svc, repo) = service();
        repo.record_misses(&[road(1), QuestionId::basic(2)], fixed_now())
            .await
            .unwrap();
        repo.record_misses(&[road(1), QuestionId::basic(77)], fixed_now() + Duration::minutes(1))
            .await
            .unwrap();

        let list = svc.list().await.unwrap();
        let listed: Vec<(QuestionId, u32)> = list
            .entries
            .iter()
            .map(|e| (e.question.id(), e.miss_count))
            .collect();
        assert_eq!(listed, vec![(road(1), 2), (QuestionId::basic(2), 1)]);
        assert_eq!(
            list.departments,
            vec![
                ReviewDepartment {
                    department: Department::Basic,
                    questions: 1
                },
                ReviewDepartment {
                    department: Department::Road,
                    questions: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn bookmarks_need_a_known_question() {
        let (svc, _) = service();
        assert!(svc.bookmark(QuestionId::basic(1)).await.unwrap());
        assert!(!svc.bookmark(QuestionId::basic(1)).await.unwrap());
        assert!(matches!(
            svc.bookmark(QuestionId::basic(50)).await,
            Err(StorageError::NotFound)
        ));

        assert!(svc.remove(QuestionId::basic(1)).await.unwrap());
        assert!(!svc.remove(QuestionId::basic(1)).await.unwrap());
        assert!(svc.list().await.unwrap().is_empty());
    }
}
