use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AttendanceRequest, LessonQuery};
use crate::api::dtos::responses::LessonResponse;
use crate::api::extractors::actor::Actor;
use crate::domain::models::lesson::LessonFilter;
use crate::domain::services::calendar::window_end;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Calendar view over the rolling window starting today. The window is
/// populated first if it has no lessons yet.
pub async fn list_lessons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LessonQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.clock.today();
    let weeks = state.config.schedule_weeks;
    state.schedule_service.ensure_schedule(today, weeks).await?;

    let filter = match params.date {
        Some(date) => LessonFilter { date: Some(date), ..Default::default() },
        None => LessonFilter { start: Some(today), end: Some(window_end(today, weeks)), ..Default::default() },
    };
    let lessons = state.lesson_repo.list(&LessonFilter {
        coach_id: params.coach_id,
        grade: params.grade,
        ..filter
    }).await?;

    let response: Vec<LessonResponse> = lessons
        .into_iter()
        .map(|s| LessonResponse::from_summary(s, &state.timetable))
        .collect();
    Ok(Json(response))
}

pub async fn get_lesson(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.booking_service.lesson_summary(lesson_id).await?;
    Ok(Json(LessonResponse::from_summary(summary, &state.timetable)))
}

pub async fn book_lesson(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = actor.learner_id()?;
    info!("book_lesson: learner {} lesson {}", learner_id, lesson_id);
    let booking = state.booking_service.book(learner_id, lesson_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn get_roster(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(lesson_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let coach_id = actor.coach_id()?;
    Ok(Json(state.booking_service.roster(coach_id, lesson_id).await?))
}

pub async fn record_attendance(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(lesson_id): Path<i64>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let coach_id = actor.coach_id()?;
    if payload.booking_ids.is_empty() {
        return Err(AppError::Validation("No bookings selected".into()));
    }
    let results = state.booking_service
        .record_attendance(coach_id, lesson_id, &payload.booking_ids)
        .await?;
    info!("Coach {} recorded attendance for {} bookings on lesson {}", coach_id, results.len(), lesson_id);
    Ok(Json(results))
}
