use chrono::{DateTime, Utc};
use rccm_core::model::QuestionId;

use super::{SqliteRepository, mapping::map_review_row};
use crate::repository::{ReviewItem, ReviewRepository, StorageError};

fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ReviewRepository for SqliteRepository {
    async fn record_misses(
        &self,
        ids: &[QuestionId],
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn_err)?;
        for id in ids {
            sqlx::query(
                r"
                    INSERT INTO review_items (question_id, miss_count, added_at, updated_at)
                    VALUES (?1, 1, ?2, ?2)
                    ON CONFLICT(question_id) DO UPDATE SET
                        miss_count = miss_count + 1,
                        updated_at = excluded.updated_at
                ",
            )
            .bind(id.to_string())
            .bind(at)
            .execute(&mut *tx)
            .await
            .map_err(conn_err)?;
        }
        tx.commit().await.map_err(conn_err)
    }

    async fn bookmark(&self, id: QuestionId, at: DateTime<Utc>) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO review_items (question_id, miss_count, added_at, updated_at)
                VALUES (?1, 0, ?2, ?2)
                ON CONFLICT(question_id) DO NOTHING
            ",
        )
        .bind(id.to_string())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(conn_err)?;
        Ok(res.rows_affected() == 1)
    }

    async fn remove_review(&self, id: QuestionId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM review_items WHERE question_id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_review(&self) -> Result<Vec<ReviewItem>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT question_id, miss_count, added_at, updated_at
                FROM review_items
                ORDER BY miss_count DESC, updated_at DESC, question_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        rows.iter().map(map_review_row).collect()
    }
}
