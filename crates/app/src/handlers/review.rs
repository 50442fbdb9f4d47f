use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::cookie::CookieJar;
use rccm_core::model::{QuestionCount, QuestionId};
use serde::Deserialize;
use tracing::info;
use ui::vm::ReviewListVm;

use crate::error::AppError;
use crate::session::{session_cookie, session_key};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewStartForm {
    #[serde(default)]
    pub questions: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    #[serde(default)]
    pub question_id: String,
}

pub async fn review_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let list = state.services.review().list().await?;
    Ok(Html(ui::render_review_list(ReviewListVm::from(&list))))
}

/// Start a quiz over the listed questions of one department.
pub async fn start_review(
    State(state): State<Arc<AppState>>,
    Path(department): Path<String>,
    jar: CookieJar,
    Form(form): Form<ReviewStartForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let department = state.services.catalog().department(&department)?;
    let count: QuestionCount = form.questions.parse()?;
    let session = state
        .services
        .quiz_loop()
        .start_review(department, count)
        .await?;

    let sessions = state.services.sessions();
    if let Some(previous) = session_key(&jar) {
        sessions.remove(previous);
    }
    let (key, _) = sessions.create(session);
    info!(%key, department = department.slug(), count = count.get(), "review session opened");

    let jar = jar.add(session_cookie(key, state.secure_cookies));
    Ok((jar, Redirect::to("/exam")))
}

pub async fn remove_review(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RemoveForm>,
) -> Result<Redirect, AppError> {
    let id: QuestionId = form
        .question_id
        .parse()
        .map_err(|_| AppError::BadRequest("問題の指定が正しくありません。".to_string()))?;
    let removed = state.services.review().remove(id).await?;
    info!(question = %id, removed, "review item removed");
    Ok(Redirect::to("/review"))
}
