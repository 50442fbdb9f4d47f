use rccm_core::model::{Department, ExamYear, QuestionId, QuizScope, QuizSummary};
use sqlx::Row;

use crate::repository::{QuizResultRow, ReviewItem, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn parse_department(s: &str) -> Result<Department, StorageError> {
    Department::from_slug(s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid department: {s}")))
}

pub(crate) fn year_to_i64(year: Option<ExamYear>) -> Option<i64> {
    year.map(|y| i64::from(y.value()))
}

fn parse_year(v: Option<i64>) -> Result<Option<ExamYear>, StorageError> {
    v.map(ExamYear::new).transpose().map_err(ser)
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizSummary, StorageError> {
    let department_slug: String = row.try_get("department").map_err(ser)?;
    let department = parse_department(&department_slug)?;
    let year = parse_year(row.try_get::<Option<i64>, _>("year").map_err(ser)?)?;
    let scope = match year {
        Some(year) => QuizScope::department_year(department, year),
        None => QuizScope::department(department),
    };

    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let correct = u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;

    QuizSummary::from_persisted(scope, started_at, completed_at, total, correct).map_err(ser)
}

pub(crate) fn map_result_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<QuizResultRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let summary = map_result_row(row)?;
    Ok(QuizResultRow::new(id, summary))
}

pub(crate) fn map_review_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReviewItem, StorageError> {
    let raw_id: String = row.try_get("question_id").map_err(ser)?;
    let question_id: QuestionId = raw_id.parse().map_err(ser)?;
    let miss_count = u32_from_i64("miss_count", row.try_get::<i64, _>("miss_count").map_err(ser)?)?;

    Ok(ReviewItem {
        question_id,
        miss_count,
        added_at: row.try_get("added_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_slugs_parse() {
        assert_eq!(parse_department("road").unwrap(), Department::Road);
        assert!(matches!(
            parse_department("deck"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn years_outside_range_are_rejected() {
        assert_eq!(parse_year(None).unwrap(), None);
        assert_eq!(
            parse_year(Some(2011)).unwrap(),
            Some(ExamYear::new(2011).unwrap())
        );
        assert!(parse_year(Some(1999)).is_err());
        assert_eq!(year_to_i64(ExamYear::new(2018).ok()), Some(2018));
    }
}
