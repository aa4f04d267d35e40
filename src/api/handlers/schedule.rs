use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ScheduleWindowRequest;
use crate::api::extractors::actor::Actor;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub async fn ensure_schedule(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<ScheduleWindowRequest>,
) -> Result<impl IntoResponse, AppError> {
    actor.coach_id()?;
    let start = payload.start.unwrap_or_else(|| state.clock.today());
    let weeks = payload.weeks.unwrap_or(state.config.schedule_weeks);
    let outcome = state.schedule_service.ensure_schedule(start, weeks).await?;
    Ok(Json(outcome))
}

pub async fn expand_templates(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<ScheduleWindowRequest>,
) -> Result<impl IntoResponse, AppError> {
    actor.coach_id()?;
    let start = payload.start.unwrap_or_else(|| state.clock.today());
    let weeks = payload.weeks.unwrap_or(state.config.schedule_weeks);
    let created = state.schedule_service.expand_templates(start, weeks).await?;
    Ok(Json(json!({ "created": created })))
}
