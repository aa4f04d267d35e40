use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{LearnerSearchQuery, RegisterLearnerRequest, UpdateGradeRequest};
use crate::api::dtos::responses::LearnerProfileResponse;
use crate::api::extractors::actor::{Actor, ActorRole};
use crate::domain::models::booking::BookingHistory;
use crate::domain::models::learner::{Learner, NewLearner, MIN_GRADE};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

const PROFILE_PAST_LIMIT: usize = 200;
const SEARCH_LIMIT: i64 = 50;

pub async fn register_learner(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<RegisterLearnerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.normalize();
    payload.validate()?;

    let learner = state.learner_repo.create(&NewLearner {
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        current_grade: payload.current_grade.unwrap_or(MIN_GRADE),
        created_at: state.clock.now(),
    }).await?;
    info!("Learner registered: {} at grade {}", learner.id, learner.current_grade);
    Ok((StatusCode::CREATED, Json(learner)))
}

/// Coach lookup by first name, last name or email fragment.
pub async fn search_learners(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Query(params): Query<LearnerSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    actor.coach_id()?;
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(Vec::<Learner>::new()));
    }
    Ok(Json(state.learner_repo.search(term, SEARCH_LIMIT).await?))
}

/// Learners see their own profile; coaches may see anyone's.
pub async fn get_learner(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(learner_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role == ActorRole::Learner && actor.id != learner_id {
        return Err(AppError::Authorization("Learners can only view their own profile".into()));
    }

    let learner = state.learner_repo.find_by_id(learner_id).await?
        .ok_or(AppError::NotFound(format!("Learner {} not found", learner_id)))?;
    let details = state.booking_repo.list_by_learner(learner_id).await?;
    let history = BookingHistory::split(details, state.clock.today(), PROFILE_PAST_LIMIT);
    Ok(Json(LearnerProfileResponse::new(learner, history)))
}

pub async fn update_grade(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    Path(learner_id): Path<i64>,
    Json(payload): Json<UpdateGradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let coach_id = actor.coach_id()?;
    payload.validate()?;

    let learner = state.learner_repo.update_grade(learner_id, payload.grade).await?;
    info!("Coach {} set learner {} to grade {}", coach_id, learner.id, learner.current_grade);
    Ok(Json(learner))
}
