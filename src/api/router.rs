use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{booking, coach, health, learner, lesson, schedule, template};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Registration
        .route("/api/v1/coaches", post(coach::register_coach).get(coach::list_coaches))
        .route("/api/v1/learners", post(learner::register_learner).get(learner::search_learners))
        .route("/api/v1/learners/{learner_id}", get(learner::get_learner))
        .route("/api/v1/learners/{learner_id}/grade", put(learner::update_grade))

        // Scheduling
        .route("/api/v1/templates", post(template::create_template).get(template::list_templates))
        .route("/api/v1/schedule/ensure", post(schedule::ensure_schedule))
        .route("/api/v1/schedule/expand", post(schedule::expand_templates))

        // Lessons
        .route("/api/v1/lessons", get(lesson::list_lessons))
        .route("/api/v1/lessons/{lesson_id}", get(lesson::get_lesson))
        .route("/api/v1/lessons/{lesson_id}/book", post(lesson::book_lesson))
        .route("/api/v1/lessons/{lesson_id}/roster", get(lesson::get_roster))
        .route("/api/v1/lessons/{lesson_id}/attendance", post(lesson::record_attendance))

        // Bookings
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/bookings/{booking_id}/review", post(booking::review_booking))
        .route("/api/v1/my/classes", get(booking::my_classes))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        actor_role = tracing::field::Empty,
                        actor_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
