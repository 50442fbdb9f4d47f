use std::collections::BTreeMap;

use async_trait::async_trait;
use rccm_core::model::{Department, ExamYear, Question, QuestionId, QuizScope};

use crate::repository::{QuestionRepository, StorageError};

/// Number of questions held for one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentCount {
    pub department: Department,
    pub questions: usize,
}

/// Specialist questions available for a single exam year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearEntry {
    pub year: ExamYear,
    /// Departments with at least one question that year, in display order.
    pub departments: Vec<DepartmentCount>,
}

impl YearEntry {
    #[must_use]
    pub fn questions(&self) -> usize {
        self.departments.iter().map(|d| d.questions).sum()
    }

    #[must_use]
    pub fn count(&self, department: Department) -> usize {
        self.departments
            .iter()
            .find(|d| d.department == department)
            .map_or(0, |d| d.questions)
    }
}

/// Snapshot of what the question bank holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub total_questions: usize,
    /// Every department in display order, including empty ones.
    pub departments: Vec<DepartmentCount>,
    /// Years with at least one specialist question, oldest first.
    pub years: Vec<YearEntry>,
}

impl Catalog {
    #[must_use]
    pub fn count(&self, department: Department) -> usize {
        self.departments
            .iter()
            .find(|d| d.department == department)
            .map_or(0, |d| d.questions)
    }

    #[must_use]
    pub fn year(&self, year: ExamYear) -> Option<&YearEntry> {
        self.years.iter().find(|entry| entry.year == year)
    }

    /// Questions available for a quiz scope.
    #[must_use]
    pub fn scope_count(&self, scope: QuizScope) -> usize {
        match scope.year {
            Some(year) => self.year(year).map_or(0, |entry| entry.count(scope.department)),
            None => self.count(scope.department),
        }
    }
}

/// Immutable in-memory index of every loaded question.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: BTreeMap<QuestionId, Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from already validated questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if two questions share an id.
    pub fn from_questions(
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<Self, StorageError> {
        let mut bank = Self::new();
        for question in questions {
            bank.insert(question)?;
        }
        Ok(bank)
    }

    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is already present.
    pub fn insert(&mut self, question: Question) -> Result<(), StorageError> {
        if self.questions.contains_key(&question.id()) {
            return Err(StorageError::Conflict);
        }
        self.questions.insert(question.id(), question);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(&id)
    }

    /// Ids of every question in the scope, in stable order.
    #[must_use]
    pub fn ids_in(&self, scope: QuizScope) -> Vec<QuestionId> {
        self.questions
            .keys()
            .copied()
            .filter(|id| scope.contains(*id))
            .collect()
    }

    #[must_use]
    pub fn count(&self, department: Department) -> usize {
        self.questions
            .keys()
            .filter(|id| id.department() == department)
            .count()
    }

    /// Years with at least one specialist question, oldest first.
    #[must_use]
    pub fn years(&self) -> Vec<ExamYear> {
        let mut years: Vec<ExamYear> = self.questions.keys().filter_map(|id| id.year()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Specialist departments with questions in `year`, in display order.
    #[must_use]
    pub fn departments_in_year(&self, year: ExamYear) -> Vec<DepartmentCount> {
        Department::specialists()
            .map(|department| DepartmentCount {
                department,
                questions: self
                    .questions
                    .keys()
                    .filter(|id| id.department() == department && id.year() == Some(year))
                    .count(),
            })
            .filter(|entry| entry.questions > 0)
            .collect()
    }

    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog {
            total_questions: self.len(),
            departments: Department::ALL
                .into_iter()
                .map(|department| DepartmentCount {
                    department,
                    questions: self.count(department),
                })
                .collect(),
            years: self
                .years()
                .into_iter()
                .map(|year| YearEntry {
                    year,
                    departments: self.departments_in_year(year),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl QuestionRepository for QuestionBank {
    async fn get_question(&self, id: QuestionId) -> Result<Question, StorageError> {
        self.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_questions(&self, scope: QuizScope) -> Result<Vec<QuestionId>, StorageError> {
        Ok(self.ids_in(scope))
    }

    async fn catalog(&self) -> Result<Catalog, StorageError> {
        Ok(QuestionBank::catalog(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rccm_core::model::Choice;

    fn question(id: QuestionId) -> Question {
        let options = ["a", "b", "c", "d"].map(String::from);
        Question::new(id, format!("Q {id}"), options, Choice::A).unwrap()
    }

    fn year(y: i64) -> ExamYear {
        ExamYear::new(y).unwrap()
    }

    fn sample_bank() -> QuestionBank {
        QuestionBank::from_questions([
            question(QuestionId::basic(1)),
            question(QuestionId::basic(2)),
            question(QuestionId::specialist(Department::Road, year(2015), 1)),
            question(QuestionId::specialist(Department::Road, year(2016), 1)),
            question(QuestionId::specialist(Department::Tunnel, year(2016), 1)),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut bank = sample_bank();
        let err = bank.insert(question(QuestionId::basic(1))).unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert_eq!(bank.len(), 5);
    }

    #[test]
    fn lists_ids_by_scope() {
        let bank = sample_bank();
        assert_eq!(bank.ids_in(QuizScope::department(Department::Basic)).len(), 2);
        assert_eq!(bank.ids_in(QuizScope::department(Department::Road)).len(), 2);
        assert_eq!(
            bank.ids_in(QuizScope::department_year(Department::Road, year(2016))),
            vec![QuestionId::specialist(Department::Road, year(2016), 1)]
        );
        assert!(
            bank.ids_in(QuizScope::department(Department::Forestry))
                .is_empty()
        );
    }

    #[test]
    fn catalog_reports_years_and_counts() {
        let catalog = sample_bank().catalog();
        assert_eq!(catalog.total_questions, 5);
        assert_eq!(catalog.count(Department::Basic), 2);
        assert_eq!(catalog.count(Department::Forestry), 0);
        assert_eq!(catalog.departments.len(), Department::ALL.len());
        assert_eq!(
            catalog.years.iter().map(|y| y.year).collect::<Vec<_>>(),
            vec![year(2015), year(2016)]
        );

        let y2016 = catalog.year(year(2016)).unwrap();
        assert_eq!(y2016.questions(), 2);
        assert_eq!(y2016.count(Department::Tunnel), 1);
        assert_eq!(
            catalog.scope_count(QuizScope::department_year(Department::Road, year(2015))),
            1
        );
        assert!(catalog.year(year(2010)).is_none());
    }

    #[tokio::test]
    async fn repository_lookup_reports_missing_questions() {
        let bank = sample_bank();
        let found = bank.get_question(QuestionId::basic(2)).await.unwrap();
        assert_eq!(found.id(), QuestionId::basic(2));
        assert!(matches!(
            bank.get_question(QuestionId::basic(99)).await,
            Err(StorageError::NotFound)
        ));
    }
}
