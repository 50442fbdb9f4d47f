use chrono::{DateTime, Utc};
use std::sync::Arc;

use rccm_core::model::{Department, QuizScope, QuizSummary};
use storage::repository::{QuizResultRepository, QuizResultRow, StorageError};

/// Presentation-agnostic list item for a stored quiz result.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizHistoryItem {
    pub id: i64,
    pub scope: QuizScope,
    pub completed_at: DateTime<Utc>,
    pub total: u32,
    pub correct: u32,
    pub accuracy_percent: f64,
    pub duration_minutes: f64,
}

impl QuizHistoryItem {
    #[must_use]
    pub fn from_summary(id: i64, summary: &QuizSummary) -> Self {
        Self {
            id,
            scope: summary.scope(),
            completed_at: summary.completed_at(),
            total: summary.total(),
            correct: summary.correct(),
            accuracy_percent: summary.accuracy_percent(),
            duration_minutes: summary.duration_minutes(),
        }
    }

    fn from_row(row: &QuizResultRow) -> Self {
        Self::from_summary(row.id, &row.summary)
    }
}

/// Totals across the listed results of one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentStats {
    pub department: Department,
    pub quizzes: usize,
    pub answered: u32,
    pub correct: u32,
}

impl DepartmentStats {
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.answered == 0 {
            return 0.0;
        }
        (f64::from(self.correct) / f64::from(self.answered) * 1000.0).round() / 10.0
    }
}

/// Recent results plus per-department totals over them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizHistory {
    pub items: Vec<QuizHistoryItem>,
    pub per_department: Vec<DepartmentStats>,
}

impl QuizHistory {
    fn from_items(items: Vec<QuizHistoryItem>) -> Self {
        let per_department = Department::ALL
            .into_iter()
            .filter_map(|department| {
                let mine = items.iter().filter(|i| i.scope.department == department);
                let stats = mine.fold(
                    DepartmentStats {
                        department,
                        quizzes: 0,
                        answered: 0,
                        correct: 0,
                    },
                    |mut acc, item| {
                        acc.quizzes += 1;
                        acc.answered += item.total;
                        acc.correct += item.correct;
                        acc
                    },
                );
                (stats.quizzes > 0).then_some(stats)
            })
            .collect();

        Self {
            items,
            per_department,
        }
    }
}

/// Read side of stored quiz results.
#[derive(Clone)]
pub struct QuizHistoryService {
    results: Arc<dyn QuizResultRepository>,
}

impl QuizHistoryService {
    #[must_use]
    pub fn new(results: Arc<dyn QuizResultRepository>) -> Self {
        Self { results }
    }

    /// Most recent results across all departments.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    pub async fn recent(&self, limit: u32) -> Result<QuizHistory, StorageError> {
        let rows = self.results.list_recent(limit).await?;
        Ok(QuizHistory::from_items(
            rows.iter().map(QuizHistoryItem::from_row).collect(),
        ))
    }

    /// Most recent results for one department.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    pub async fn for_department(
        &self,
        department: Department,
        limit: u32,
    ) -> Result<QuizHistory, StorageError> {
        let rows = self.results.list_by_department(department, limit).await?;
        Ok(QuizHistory::from_items(
            rows.iter().map(QuizHistoryItem::from_row).collect(),
        ))
    }

    /// A single stored result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    pub async fn result(&self, id: i64) -> Result<QuizHistoryItem, StorageError> {
        let summary = self.results.get_result(id).await?;
        Ok(QuizHistoryItem::from_summary(id, &summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rccm_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seeded() -> QuizHistoryService {
        let repo = InMemoryRepository::new();
        for (i, (department, correct)) in [
            (Department::Road, 7),
            (Department::Basic, 5),
            (Department::Road, 9),
        ]
        .into_iter()
        .enumerate()
        {
            let start = fixed_now() + Duration::minutes(i64::try_from(i).unwrap() * 10);
            let summary = QuizSummary::from_persisted(
                QuizScope::department(department),
                start,
                start + Duration::minutes(4),
                10,
                correct,
            )
            .unwrap();
            repo.append_result(&format!("quiz-{i}"), &summary).await.unwrap();
        }
        QuizHistoryService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn recent_history_aggregates_per_department() {
        let history = seeded().await.recent(10).await.unwrap();
        assert_eq!(history.items.len(), 3);
        assert_eq!(history.items[0].id, 3);
        assert!((history.items[0].accuracy_percent - 90.0).abs() < f64::EPSILON);
        assert!((history.items[0].duration_minutes - 4.0).abs() < f64::EPSILON);

        let road = history
            .per_department
            .iter()
            .find(|s| s.department == Department::Road)
            .unwrap();
        assert_eq!(road.quizzes, 2);
        assert_eq!(road.answered, 20);
        assert!((road.accuracy_percent() - 80.0).abs() < f64::EPSILON);
        assert_eq!(history.per_department.len(), 2);
    }

    #[tokio::test]
    async fn filters_by_department_and_fetches_single_results() {
        let svc = seeded().await;
        let basic = svc.for_department(Department::Basic, 10).await.unwrap();
        assert_eq!(basic.items.len(), 1);
        assert_eq!(basic.items[0].correct, 5);

        assert_eq!(svc.result(1).await.unwrap().correct, 7);
        assert!(matches!(svc.result(42).await, Err(StorageError::NotFound)));
    }
}
