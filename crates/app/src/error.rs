use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use rccm_core::model::CountError;
use services::{CatalogError, QuizError};
use storage::repository::StorageError;
use thiserror::Error;
use tracing::error;
use ui::vm::ErrorVm;

/// Failure of a request handler, rendered as an HTML error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownDepartment(slug) => {
                AppError::NotFound(format!("部門「{slug}」は存在しません。"))
            }
            CatalogError::Year(_) => {
                AppError::BadRequest("対応していない年度が指定されました。".to_string())
            }
            CatalogError::NoDataForYear(year) => {
                AppError::NotFound(format!("{year}年度の問題は登録されていません。"))
            }
            CatalogError::NoQuestions(label) => {
                AppError::NotFound(format!("{label}の問題は登録されていません。"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::Empty => AppError::NotFound("出題できる問題がありません。".to_string()),
            QuizError::InvalidAnswer(_) => {
                AppError::BadRequest("解答は A から D のいずれかを選んでください。".to_string())
            }
            QuizError::Completed
            | QuizError::NotComplete
            | QuizError::NotAwaitingAnswer
            | QuizError::NotInFeedback => {
                AppError::BadRequest("この操作は現在の問題では行えません。".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<CountError> for AppError {
    fn from(_: CountError) -> Self {
        AppError::BadRequest("問題数は 10・20・30 から選んでください。".to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AppError::NotFound("結果が見つかりません。".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let vm = match self {
            AppError::NotFound(message) => ErrorVm::not_found(message),
            AppError::BadRequest(message) => ErrorVm::bad_request(message),
            AppError::Internal(detail) => {
                error!(%detail, "request failed");
                ErrorVm::internal()
            }
        };
        (status, Html(ui::render_error(vm))).into_response()
    }
}
