use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
    pub questions: usize,
    pub active_sessions: usize,
    pub uptime_seconds: u64,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthData>, AppError> {
    let catalog = state.services.catalog().overview().await?;
    Ok(Json(HealthData {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        questions: catalog.total_questions,
        active_sessions: state.services.sessions().len(),
        uptime_seconds: state.uptime_seconds(),
    }))
}
