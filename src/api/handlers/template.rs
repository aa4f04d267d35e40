use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateTemplateRequest;
use crate::api::extractors::actor::Actor;
use crate::domain::models::template::NewLessonTemplate;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_template(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    actor.coach_id()?;
    let created = state.schedule_service.create_template(&NewLessonTemplate {
        day_of_week: payload.day_of_week.trim().to_string(),
        time_slot: payload.time_slot.trim().to_string(),
        grade_level: payload.grade_level,
        coach_id: payload.coach_id,
        created_at: state.clock.now(),
    }).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.template_repo.list().await?))
}
