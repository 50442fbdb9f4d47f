use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use ui::vm::{HomeVm, YearPageVm};

use crate::error::AppError;
use crate::state::AppState;

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let catalog = state.services.catalog().overview().await?;
    Ok(Html(ui::render_home(HomeVm::from(&catalog))))
}

pub async fn year_page(
    State(state): State<Arc<AppState>>,
    Path(year): Path<String>,
) -> Result<Html<String>, AppError> {
    let entry = state.services.catalog().year(&year).await?;
    Ok(Html(ui::render_year(YearPageVm::from(&entry))))
}
