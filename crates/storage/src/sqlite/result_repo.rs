use rccm_core::model::{Department, QuizSummary};

use super::{
    SqliteRepository,
    mapping::{map_result_row, map_result_row_with_id, year_to_i64},
};
use crate::repository::{QuizResultRepository, QuizResultRow, StorageError};

const SELECT_RESULTS: &str = r"
    SELECT id, department, year, started_at, completed_at, total, correct
    FROM quiz_results
";

impl SqliteRepository {
    async fn fetch_result_rows(
        &self,
        department: Option<Department>,
        limit: u32,
    ) -> Result<Vec<QuizResultRow>, StorageError> {
        let mut sql = String::from(SELECT_RESULTS);
        let mut bind_index = 1;
        if department.is_some() {
            sql.push_str(" WHERE department = ?1");
            bind_index += 1;
        }
        sql.push_str(" ORDER BY completed_at DESC, id DESC");
        sql.push_str(" LIMIT ?");
        sql.push_str(&bind_index.to_string());

        let mut query = sqlx::query(&sql);
        if let Some(department) = department {
            query = query.bind(department.slug());
        }
        query = query.bind(i64::from(limit));

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row_with_id(&row)?);
        }

        Ok(out)
    }
}

#[async_trait::async_trait]
impl QuizResultRepository for SqliteRepository {
    async fn append_result(
        &self,
        attempt_key: &str,
        summary: &QuizSummary,
    ) -> Result<i64, StorageError> {
        let scope = summary.scope();

        sqlx::query(
            r"
                INSERT INTO quiz_results (
                    attempt_key, department, year, started_at, completed_at, total, correct
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(attempt_key) DO NOTHING
            ",
        )
        .bind(attempt_key)
        .bind(scope.department.slug())
        .bind(year_to_i64(scope.year))
        .bind(summary.started_at())
        .bind(summary.completed_at())
        .bind(i64::from(summary.total()))
        .bind(i64::from(summary.correct()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // the first row wins when the same quiz is stored twice
        sqlx::query_scalar::<_, i64>("SELECT id FROM quiz_results WHERE attempt_key = ?1")
            .bind(attempt_key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    async fn get_result(&self, id: i64) -> Result<QuizSummary, StorageError> {
        let mut sql = String::from(SELECT_RESULTS);
        sql.push_str(" WHERE id = ?1");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .ok_or(StorageError::NotFound)?;

        map_result_row(&row)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<QuizResultRow>, StorageError> {
        self.fetch_result_rows(None, limit).await
    }

    async fn list_by_department(
        &self,
        department: Department,
        limit: u32,
    ) -> Result<Vec<QuizResultRow>, StorageError> {
        self.fetch_result_rows(Some(department), limit).await
    }
}
