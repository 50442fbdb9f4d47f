use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use ui::vm::HistoryVm;

use crate::error::AppError;
use crate::state::AppState;

const HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub department: Option<String>,
}

pub async fn history_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Html<String>, AppError> {
    let history = state.services.history();
    let items = match query.department.as_deref().filter(|d| !d.is_empty()) {
        Some(slug) => {
            let department = state.services.catalog().department(slug)?;
            history.for_department(department, HISTORY_LIMIT).await?
        }
        None => history.recent(HISTORY_LIMIT).await?,
    };
    Ok(Html(ui::render_history(HistoryVm::from(&items))))
}
