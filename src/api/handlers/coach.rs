use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::RegisterCoachRequest;
use crate::api::dtos::responses::{CoachRegisteredResponse, CoachResponse};
use crate::domain::models::coach::NewCoach;
use crate::domain::models::review::average_rating;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Registers a coach and folds them into the upcoming rotation. A failed
/// rotation update is logged and does not undo the registration.
pub async fn register_coach(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<RegisterCoachRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.normalize();
    payload.validate()?;

    let coach = state.coach_repo.create(&NewCoach {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        created_at: state.clock.now(),
    }).await?;
    info!("Coach registered: {} ({})", coach.id, coach.email);

    let today = state.clock.today();
    let integration = match state.schedule_service
        .integrate_new_coach(coach.id, today, state.config.schedule_weeks)
        .await
    {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("Coach {} registered but rotation update failed: {:?}", coach.id, e);
            None
        }
    };

    Ok((StatusCode::CREATED, Json(CoachRegisteredResponse { coach, integration })))
}

/// Coach directory ordered by first then last name.
pub async fn list_coaches(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let mut coaches = state.coach_repo.list_by_join_order().await?;
    coaches.sort_by_cached_key(|c| (c.first_name.to_lowercase(), c.last_name.to_lowercase(), c.id));

    let mut response = Vec::with_capacity(coaches.len());
    for coach in coaches {
        let ratings = state.review_repo.ratings_for_coach(coach.id).await?;
        response.push(CoachResponse {
            average_rating: average_rating(&ratings),
            review_count: ratings.len(),
            coach,
        });
    }
    Ok(Json(response))
}
