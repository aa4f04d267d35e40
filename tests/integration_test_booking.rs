mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{at, monday, TestApp};
use lesson_scheduler::domain::models::booking::NewBooking;
use lesson_scheduler::error::AppError;
use serde_json::{json, Value};

fn wednesday() -> chrono::NaiveDate {
    monday() + Duration::days(2)
}

async fn app_with_coach() -> (TestApp, i64) {
    let app = TestApp::new().await;
    let (coach, _) = app.register_coach("Ana", "Silva").await;
    (app, coach)
}

async fn cancel(app: &TestApp, learner: i64, booking: &Value) -> (StatusCode, Value) {
    app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking["id"]), Some(("learner", learner)), None).await
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_grade_eligibility() {
    let (app, _) = app_with_coach().await;
    let beginner = app.register_learner("Lou", "Reed", 0).await;
    let advanced = app.register_learner("Nia", "Long", 2).await;

    let grade_one = app.lesson_id(monday(), "4-5pm").await;
    let grade_three = app.lesson_id(monday(), "6-7pm").await;

    let (status, _) = app.book(beginner, grade_one).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = app.book(beginner, grade_three).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("grade"));

    let (status, _) = app.book(advanced, grade_one).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = app.book(advanced, grade_three).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_capacity_limit_and_freed_seat() {
    let (app, _) = app_with_coach().await;
    let lesson = app.lesson_id(wednesday(), "4-5pm").await;

    let mut bookings = Vec::new();
    for name in ["Amy", "Bo", "Cy", "Di"] {
        let learner = app.register_learner(name, "Grey", 1).await;
        let (status, booking) = app.book(learner, lesson).await;
        assert_eq!(status, StatusCode::CREATED);
        bookings.push((learner, booking));
    }

    let late = app.register_learner("Ed", "Grey", 1).await;
    let (status, _) = app.book(late, lesson).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = app.send("GET", &format!("/api/v1/lessons/{}", lesson), None, None).await;
    assert_eq!(detail["available_spaces"], 0);
    assert_eq!(detail["is_full"], true);

    let (learner, booking) = &bookings[0];
    let (status, _) = cancel(&app, *learner, booking).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.book(late, lesson).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, detail) = app.send("GET", &format!("/api/v1/lessons/{}", lesson), None, None).await;
    assert_eq!(detail["booked_count"], 4);
}

#[tokio::test]
async fn test_store_rejects_booking_past_capacity() {
    let (app, _) = app_with_coach().await;
    let lesson = app.lesson_id(wednesday(), "4-5pm").await;
    for name in ["Amy", "Bo", "Cy", "Di"] {
        let learner = app.register_learner(name, "Grey", 1).await;
        app.book(learner, lesson).await;
    }
    let late = app.register_learner("Ed", "Grey", 1).await;

    // Skips the service-level check, as a racing request would
    let result = app.state.booking_repo.create_booked(&NewBooking {
        learner_id: late,
        lesson_id: lesson,
        booked_at: at(monday(), 9, 0),
    }).await;
    assert!(matches!(result, Err(AppError::Capacity(_))));
    assert_eq!(app.state.lesson_repo.count_booked(lesson).await.unwrap(), 4);
}

#[tokio::test]
async fn test_rebooking_same_lesson_is_idempotent() {
    let (app, _) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;
    let lesson = app.lesson_id(wednesday(), "5-6pm").await;

    let (_, first) = app.book(learner, lesson).await;
    let (status, second) = app.book(learner, lesson).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["id"], second["id"]);

    let (_, detail) = app.send("GET", &format!("/api/v1/lessons/{}", lesson), None, None).await;
    assert_eq!(detail["booked_count"], 1);
}

#[tokio::test]
async fn test_cancellation_notice_window() {
    let (app, _) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;

    // Seven hours before Monday's first lesson
    let soon = app.lesson_id(monday(), "4-5pm").await;
    let (_, booking) = app.book(learner, soon).await;
    let (status, _) = cancel(&app, learner, &booking).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let later = app.lesson_id(wednesday(), "4-5pm").await;
    let (_, booking) = app.book(learner, later).await;
    let (status, cancelled) = cancel(&app, learner, &booking).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["booking_status"], "cancelled");

    let (status, again) = cancel(&app, learner, &booking).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["booking_status"], "cancelled");

    let (status, rebooked) = app.book(learner, later).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rebooked["booking_status"], "booked");
    let rows = app.state.booking_repo.list_by_lesson(later).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].booking_status, "booked");

    // Exactly 24 hours ahead is still allowed
    app.clock.set(at(monday() + Duration::days(1), 16, 0));
    let (status, _) = cancel(&app, learner, &rebooked).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_identity_and_ownership() {
    let (app, coach) = app_with_coach().await;
    let owner = app.register_learner("Lou", "Reed", 1).await;
    let other = app.register_learner("Nia", "Long", 1).await;
    let lesson = app.lesson_id(wednesday(), "4-5pm").await;
    let (_, booking) = app.book(owner, lesson).await;

    let (status, _) = cancel(&app, other, &booking).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send(
        "POST", &format!("/api/v1/bookings/{}/cancel", booking["id"]), Some(("coach", coach)), None,
    ).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send("POST", &format!("/api/v1/lessons/{}/book", lesson), Some(("coach", coach)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("POST", &format!("/api/v1/lessons/{}/book", lesson), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.book(9999, lesson).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.book(owner, 9999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_started_lesson_cannot_be_booked() {
    let (app, _) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;
    let lesson = app.lesson_id(monday(), "4-5pm").await;

    app.clock.set(at(monday(), 16, 30));
    let (status, _) = app.book(learner, lesson).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_attendance_promotes_once() {
    let (app, coach) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;
    let lesson = app.lesson_id(monday(), "5-6pm").await;
    let (_, booking) = app.book(learner, lesson).await;

    app.clock.set(at(monday(), 18, 30));
    let uri = format!("/api/v1/lessons/{}/attendance", lesson);
    let (status, results) = app.send("POST", &uri, Some(("coach", coach)), Some(json!({ "booking_ids": [booking["id"]] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["promoted_to"], 2);
    assert_eq!(results[0]["booking"]["attended"], true);
    assert_eq!(results[0]["booking"]["booking_status"], "attended");

    let (_, profile) = app.send("GET", &format!("/api/v1/learners/{}", learner), Some(("coach", coach)), None).await;
    assert_eq!(profile["current_grade"], 2);

    // A manual downgrade is not undone by re-marking the same booking
    let (status, _) = app.send(
        "PUT", &format!("/api/v1/learners/{}/grade", learner), Some(("coach", coach)), Some(json!({ "grade": 1 })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    let (_, results) = app.send("POST", &uri, Some(("coach", coach)), Some(json!({ "booking_ids": [booking["id"]] }))).await;
    assert_eq!(results[0]["promoted_to"], Value::Null);
    let (_, profile) = app.send("GET", &format!("/api/v1/learners/{}", learner), Some(("learner", learner)), None).await;
    assert_eq!(profile["current_grade"], 1);
}

#[tokio::test]
async fn test_attendance_restricted_to_lesson_coach() {
    let (app, coach) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;
    let lesson = app.lesson_id(monday(), "5-6pm").await;
    let (_, booking) = app.book(learner, lesson).await;
    let other_lesson = app.lesson_id(monday(), "4-5pm").await;

    let (outsider, _) = app.register_coach("Ben", "Okafor").await;
    let (_, detail) = app.send("GET", &format!("/api/v1/lessons/{}", lesson), None, None).await;
    assert_eq!(detail["coach_id"], coach);

    let body = json!({ "booking_ids": [booking["id"]] });
    let (status, _) = app.send(
        "POST", &format!("/api/v1/lessons/{}/attendance", lesson), Some(("coach", outsider)), Some(body.clone()),
    ).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(
        "POST", &format!("/api/v1/lessons/{}/attendance", other_lesson), Some(("coach", coach)), Some(body),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(
        "POST", &format!("/api/v1/lessons/{}/attendance", lesson), Some(("learner", learner)),
        Some(json!({ "booking_ids": [booking["id"]] })),
    ).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_roster_lists_booked_learners_by_name() {
    let (app, coach) = app_with_coach().await;
    let lesson = app.lesson_id(wednesday(), "5-6pm").await;

    let zane = app.register_learner("Ivy", "Zane", 1).await;
    let adams = app.register_learner("Max", "adams", 2).await;
    let miller = app.register_learner("Kit", "Miller", 2).await;
    for learner in [zane, adams, miller] {
        app.book(learner, lesson).await;
    }
    let quitter = app.register_learner("Rae", "Baker", 2).await;
    let (_, booking) = app.book(quitter, lesson).await;
    cancel(&app, quitter, &booking).await;

    let (status, roster) = app.send("GET", &format!("/api/v1/lessons/{}/roster", lesson), Some(("coach", coach)), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = roster.as_array().unwrap().iter().map(|r| r["last_name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["adams", "Miller", "Zane"]);

    let (status, _) = app.send("GET", &format!("/api/v1/lessons/{}/roster", lesson), Some(("learner", zane)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sweep_marks_past_bookings_missed() {
    let (app, _) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 0).await;
    app.book(learner, app.lesson_id(monday(), "4-5pm").await).await;
    app.book(learner, app.lesson_id(wednesday(), "4-5pm").await).await;

    let tuesday = monday() + Duration::days(1);
    app.clock.set(at(tuesday, 9, 0));
    assert_eq!(app.state.booking_service.sweep_missed(tuesday).await.unwrap(), 1);
    assert_eq!(app.state.booking_service.sweep_missed(tuesday).await.unwrap(), 0);

    let (status, classes) = app.send("GET", "/api/v1/my/classes", Some(("learner", learner)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(classes["upcoming"].as_array().unwrap().len(), 1);
    assert_eq!(classes["upcoming"][0]["lesson_date"], "2026-10-14");
    assert_eq!(classes["past"].as_array().unwrap().len(), 1);
    assert_eq!(classes["past"][0]["booking_status"], "missed");
    assert_eq!(classes["past"][0]["lesson_date"], "2026-10-12");

    let (_, profile) = app.send("GET", &format!("/api/v1/learners/{}", learner), Some(("learner", learner)), None).await;
    assert_eq!(profile["missed"], 1);
    assert_eq!(profile["upcoming"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reviews_feed_coach_rating() {
    let (app, coach) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 0).await;
    let other = app.register_learner("Nia", "Long", 0).await;

    let lesson = app.lesson_id(monday(), "4-5pm").await;
    let (_, booking) = app.book(learner, lesson).await;
    let (_, future) = app.book(learner, app.lesson_id(wednesday(), "4-5pm").await).await;

    let review_uri = |b: &Value| format!("/api/v1/bookings/{}/review", b["id"]);

    let (status, _) = app.send("POST", &review_uri(&future), Some(("learner", learner)), Some(json!({ "rating": 4 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.clock.set(at(monday(), 17, 30));
    app.send(
        "POST", &format!("/api/v1/lessons/{}/attendance", lesson), Some(("coach", coach)),
        Some(json!({ "booking_ids": [booking["id"]] })),
    ).await;

    let (status, _) = app.send("POST", &review_uri(&booking), Some(("learner", learner)), Some(json!({ "rating": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send("POST", &review_uri(&booking), Some(("learner", other)), Some(json!({ "rating": 5 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, first) = app.send("POST", &review_uri(&booking), Some(("learner", learner)), Some(json!({ "rating": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, replaced) = app.send(
        "POST", &review_uri(&booking), Some(("learner", learner)), Some(json!({ "rating": 3, "comment": "  Good pace  " })),
    ).await;
    assert_eq!(replaced["id"], first["id"]);
    assert_eq!(replaced["rating"], 3);
    assert_eq!(replaced["comment"], "Good pace");

    let (_, coaches) = app.send("GET", "/api/v1/coaches", None, None).await;
    assert_eq!(coaches[0]["id"], coach);
    assert_eq!(coaches[0]["average_rating"], 3.0);
    assert_eq!(coaches[0]["review_count"], 1);
}

#[tokio::test]
async fn test_registration_and_grade_validation() {
    let (app, coach) = app_with_coach().await;

    let (status, _) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "Lou", "last_name": "Reed", "email": "not-an-email",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "Lou", "last_name": "Reed", "email": "lou@learners.test", "current_grade": 6,
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, learner) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "Lou", "last_name": "Reed", "email": "lou@learners.test",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(learner["current_grade"], 0);
    let id = learner["id"].as_i64().unwrap();

    let (status, _) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "Lou", "last_name": "Reed", "email": "lou@learners.test",
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let grade_uri = format!("/api/v1/learners/{}/grade", id);
    let (status, updated) = app.send("PUT", &grade_uri, Some(("coach", coach)), Some(json!({ "grade": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["current_grade"], 4);
    let (status, _) = app.send("PUT", &grade_uri, Some(("coach", coach)), Some(json!({ "grade": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send("PUT", &grade_uri, Some(("learner", id)), Some(json!({ "grade": 5 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stranger = app.register_learner("Nia", "Long", 0).await;
    let (status, _) = app.send("GET", &format!("/api/v1/learners/{}", id), Some(("learner", stranger)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejected_attendance_form_changes_nothing() {
    let (app, coach) = app_with_coach().await;
    let kept = app.register_learner("Lou", "Reed", 1).await;
    let dropped = app.register_learner("Nia", "Long", 1).await;
    let lesson = app.lesson_id(wednesday(), "5-6pm").await;
    let (_, kept_booking) = app.book(kept, lesson).await;
    let (_, dropped_booking) = app.book(dropped, lesson).await;
    let (status, _) = cancel(&app, dropped, &dropped_booking).await;
    assert_eq!(status, StatusCode::OK);

    app.clock.set(at(wednesday(), 18, 30));
    let uri = format!("/api/v1/lessons/{}/attendance", lesson);
    let (status, _) = app.send(
        "POST", &uri, Some(("coach", coach)),
        Some(json!({ "booking_ids": [kept_booking["id"], dropped_booking["id"]] })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bookings = app.state.booking_repo.list_by_lesson(lesson).await.unwrap();
    let kept_row = bookings.iter().find(|b| Some(b.id) == kept_booking["id"].as_i64()).unwrap();
    assert_eq!(kept_row.booking_status, "booked");
    assert!(!kept_row.attended);
    let learner = app.state.learner_repo.find_by_id(kept).await.unwrap().unwrap();
    assert_eq!(learner.current_grade, 1);

    let (status, results) = app.send(
        "POST", &uri, Some(("coach", coach)), Some(json!({ "booking_ids": [kept_booking["id"]] })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["promoted_to"], 2);
}

#[tokio::test]
async fn test_profile_counts_only_past_lessons() {
    let (app, coach) = app_with_coach().await;
    let learner = app.register_learner("Lou", "Reed", 1).await;
    let today_lesson = app.lesson_id(monday(), "5-6pm").await;
    let (_, attended) = app.book(learner, today_lesson).await;
    let (_, later) = app.book(learner, app.lesson_id(wednesday(), "5-6pm").await).await;
    let (_, kept) = app.book(learner, app.lesson_id(wednesday() + Duration::days(1), "5-6pm").await).await;

    let (status, _) = cancel(&app, learner, &later).await;
    assert_eq!(status, StatusCode::OK);

    let profile_uri = format!("/api/v1/learners/{}", learner);
    let (status, profile) = app.send("GET", &profile_uri, Some(("learner", learner)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["cancelled"], 0);
    let upcoming: Vec<i64> = profile["upcoming"].as_array().unwrap().iter().filter_map(|b| b["id"].as_i64()).collect();
    assert_eq!(upcoming, vec![attended["id"].as_i64().unwrap(), kept["id"].as_i64().unwrap()]);
    assert_eq!(profile["past"].as_array().unwrap().len(), 0);

    app.clock.set(at(monday(), 18, 30));
    app.send(
        "POST", &format!("/api/v1/lessons/{}/attendance", today_lesson), Some(("coach", coach)),
        Some(json!({ "booking_ids": [attended["id"]] })),
    ).await;

    app.clock.set(at(wednesday() + Duration::days(1), 9, 0));
    let (_, profile) = app.send("GET", &profile_uri, Some(("coach", coach)), None).await;
    assert_eq!(profile["attended"], 1);
    assert_eq!(profile["cancelled"], 1);
    assert_eq!(profile["missed"], 0);
    assert_eq!(profile["past"][0]["booking_status"], "cancelled");
    assert_eq!(profile["past"][1]["booking_status"], "attended");
    assert_eq!(profile["upcoming"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_coach_classes_split_by_today() {
    let (app, coach) = app_with_coach().await;
    let (other, _) = app.register_coach("Ben", "Okafor").await;

    app.clock.set(at(wednesday(), 9, 0));
    let (status, classes) = app.send("GET", "/api/v1/my/classes", Some(("coach", coach)), None).await;
    assert_eq!(status, StatusCode::OK);

    let upcoming = classes["upcoming"].as_array().unwrap();
    let past = classes["past"].as_array().unwrap();
    assert!(!upcoming.is_empty());
    assert!(!past.is_empty());
    assert!(upcoming.iter().chain(past).all(|l| l["coach_id"] == coach));
    assert!(upcoming.iter().all(|l| l["lesson_date"].as_str().unwrap() >= "2026-10-14"));
    assert!(past.iter().all(|l| l["lesson_date"].as_str().unwrap() < "2026-10-14"));

    let upcoming_keys: Vec<(String, String)> = upcoming.iter()
        .map(|l| (l["lesson_date"].to_string(), l["starts_at"].to_string()))
        .collect();
    assert!(upcoming_keys.windows(2).all(|w| w[0] <= w[1]));
    let past_keys: Vec<(String, String)> = past.iter()
        .map(|l| (l["lesson_date"].to_string(), l["starts_at"].to_string()))
        .collect();
    assert!(past_keys.windows(2).all(|w| w[0] >= w[1]));

    let (_, theirs) = app.send("GET", "/api/v1/my/classes", Some(("coach", other)), None).await;
    assert!(theirs["upcoming"].as_array().unwrap().iter().all(|l| l["coach_id"] == other));
}

#[tokio::test]
async fn test_learner_search_for_coaches() {
    let (app, coach) = app_with_coach().await;
    let lou = app.register_learner("Lou", "Reed", 0).await;
    app.register_learner("Nia", "Long", 0).await;
    let anna = app.register_learner("Anna", "Louis", 2).await;

    let (status, found) = app.send("GET", "/api/v1/learners?q=%20LOU%20", Some(("coach", coach)), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = found.as_array().unwrap().iter().filter_map(|l| l["id"].as_i64()).collect();
    assert_eq!(ids, vec![anna, lou]);

    let (_, by_email) = app.send("GET", "/api/v1/learners?q=long%40learners", Some(("coach", coach)), None).await;
    assert_eq!(by_email.as_array().unwrap().len(), 1);
    assert_eq!(by_email[0]["first_name"], "Nia");

    let (status, empty) = app.send("GET", "/api/v1/learners?q=%20%20", Some(("coach", coach)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!([]));
    let (_, none) = app.send("GET", "/api/v1/learners?q=100%25", Some(("coach", coach)), None).await;
    assert_eq!(none, json!([]));

    let (status, _) = app.send("GET", "/api/v1/learners?q=lou", Some(("learner", lou)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_registration_rejects_malformed_contacts() {
    let app = TestApp::new().await;

    for email in ["a b@.x", "x@.com", "plain", ""] {
        let (status, _) = app.send("POST", "/api/v1/learners", None, Some(json!({
            "first_name": "Lou", "last_name": "Reed", "email": email,
        }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted learner email {:?}", email);

        let (status, _) = app.send("POST", "/api/v1/coaches", None, Some(json!({
            "first_name": "Ana", "last_name": "Silva", "email": email,
        }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted coach email {:?}", email);
    }

    let (status, _) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "   ", "last_name": "Reed", "email": "lou@learners.test",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, learner) = app.send("POST", "/api/v1/learners", None, Some(json!({
        "first_name": "  Lou ", "last_name": "Reed", "email": " Lou@Learners.TEST ",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(learner["first_name"], "Lou");
    assert_eq!(learner["email"], "lou@learners.test");
}

#[tokio::test]
async fn test_coach_directory_ordered_by_name() {
    let app = TestApp::new().await;
    app.register_coach("Ben", "Okafor").await;
    app.register_coach("Ana", "Silva").await;
    app.register_coach("Ana", "Moreno").await;

    let (status, coaches) = app.send("GET", "/api/v1/coaches", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = coaches.as_array().unwrap().iter()
        .map(|c| format!("{} {}", c["first_name"].as_str().unwrap(), c["last_name"].as_str().unwrap()))
        .collect();
    assert_eq!(names, vec!["Ana Moreno", "Ana Silva", "Ben Okafor"]);
}
