pub mod catalog;
pub mod health;
pub mod history;
pub mod quiz;
pub mod review;

use axum::response::IntoResponse;

use crate::error::AppError;

pub async fn not_found() -> impl IntoResponse {
    AppError::NotFound("お探しのページは見つかりませんでした。".to_string())
}
