use std::sync::Arc;

use rccm_core::model::{Department, ExamYear, QuizScope};
use storage::bank::{Catalog, YearEntry};
use storage::repository::QuestionRepository;

use crate::error::CatalogError;

/// Resolves what the question bank can offer: departments, years and scopes.
#[derive(Clone)]
pub struct CatalogService {
    questions: Arc<dyn QuestionRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Departments with question counts and the available years.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the bank cannot be read.
    pub async fn overview(&self) -> Result<Catalog, CatalogError> {
        Ok(self.questions.catalog().await?)
    }

    /// Specialist departments offered in one exam year.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Year` for an unsupported year and
    /// `CatalogError::NoDataForYear` if the bank has no questions for it.
    pub async fn year(&self, raw_year: &str) -> Result<YearEntry, CatalogError> {
        let year: ExamYear = raw_year.parse()?;
        self.overview()
            .await?
            .year(year)
            .cloned()
            .ok_or(CatalogError::NoDataForYear(year))
    }

    /// Look up a department by URL slug.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownDepartment` for an unknown slug.
    pub fn department(&self, slug: &str) -> Result<Department, CatalogError> {
        Department::from_slug(slug).ok_or_else(|| CatalogError::UnknownDepartment(slug.to_string()))
    }

    /// Build the scope of a quiz and check that it holds questions.
    ///
    /// A blank year means every year. Basic questions ignore the year.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownDepartment`, `CatalogError::Year`, or
    /// `CatalogError::NoQuestions` if nothing can be asked.
    pub async fn resolve_scope(
        &self,
        slug: &str,
        raw_year: Option<&str>,
    ) -> Result<(QuizScope, usize), CatalogError> {
        let department = self.department(slug)?;
        let year = raw_year
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map(str::parse::<ExamYear>)
            .transpose()?;

        let scope = match year {
            Some(year) => QuizScope::department_year(department, year),
            None => QuizScope::department(department),
        };

        let available = self.overview().await?.scope_count(scope);
        if available == 0 {
            return Err(CatalogError::NoQuestions(scope.label()));
        }
        Ok((scope, available))
    }
}
