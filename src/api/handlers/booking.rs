use axum::{extract::{Path, State}, response::{IntoResponse, Response}, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ReviewRequest;
use crate::api::dtos::responses::{CoachClassesResponse, LessonResponse};
use crate::api::extractors::actor::{Actor, ActorRole};
use crate::domain::models::booking::BookingHistory;
use crate::domain::models::lesson::LessonFilter;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const CLASSES_PAST_LIMIT: usize = 50;

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = actor.learner_id()?;
    let booking = state.booking_service.cancel(booking_id, learner_id).await?;
    Ok(Json(booking))
}

pub async fn review_booking(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(booking_id): Path<i64>,
    Json(payload): Json<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let learner_id = actor.learner_id()?;
    let review = state.booking_service
        .submit_review(learner_id, booking_id, payload.rating, payload.comment)
        .await?;
    info!("Review saved for booking {}: {} stars", booking_id, review.rating);
    Ok(Json(review))
}

/// Learners get their bookings, coaches the lessons they run, each split
/// into upcoming (soonest first) and past (latest first).
pub async fn my_classes(
    State(state): State<Arc<AppState>>,
    actor: Actor,
) -> Result<Response, AppError> {
    let today = state.clock.today();
    match actor.role {
        ActorRole::Learner => {
            let details = state.booking_repo.list_by_learner(actor.id).await?;
            Ok(Json(BookingHistory::split(details, today, CLASSES_PAST_LIMIT)).into_response())
        }
        ActorRole::Coach => {
            let upcoming = state.lesson_repo
                .list(&LessonFilter { coach_id: Some(actor.id), start: Some(today), ..Default::default() })
                .await?;
            let mut past = state.lesson_repo
                .list(&LessonFilter { coach_id: Some(actor.id), end: Some(today), ..Default::default() })
                .await?;
            past.reverse();
            past.truncate(CLASSES_PAST_LIMIT);

            Ok(Json(CoachClassesResponse {
                upcoming: upcoming.into_iter().map(|l| LessonResponse::from_summary(l, &state.timetable)).collect(),
                past: past.into_iter().map(|l| LessonResponse::from_summary(l, &state.timetable)).collect(),
            }).into_response())
        }
    }
}
