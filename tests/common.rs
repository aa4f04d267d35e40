use lesson_scheduler::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::Clock,
    infra::factory::{build_state, Repositories},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Monday; the first lesson of the day is at 16:00.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub clock: Arc<FixedClock>,
}

#[allow(dead_code)]
impl TestApp {
    /// Fresh database with the clock at Monday 09:00.
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            ..Default::default()
        };

        let clock = Arc::new(FixedClock::new(at(monday(), 9, 0)));
        let state = Arc::new(build_state(config, Repositories::sqlite(pool.clone()), clock.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            clock,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, actor: Option<(&str, i64)>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((role, id)) = actor {
            builder = builder.header("X-Actor-Role", role).header("X-Actor-Id", id.to_string());
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    pub async fn register_coach(&self, first: &str, last: &str) -> (i64, Value) {
        let (status, body) = self.send("POST", "/api/v1/coaches", None, Some(json!({
            "first_name": first,
            "last_name": last,
            "email": format!("{}.{}@coaching.test", first, last).to_lowercase(),
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "coach registration failed: {}", body);
        (body["coach"]["id"].as_i64().unwrap(), body)
    }

    pub async fn register_learner(&self, first: &str, last: &str, grade: i32) -> i64 {
        let (status, body) = self.send("POST", "/api/v1/learners", None, Some(json!({
            "first_name": first,
            "last_name": last,
            "email": format!("{}.{}@learners.test", first, last).to_lowercase(),
            "current_grade": grade,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "learner registration failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Lessons on one date, ordered by slot.
    pub async fn lessons_on(&self, date: NaiveDate) -> Vec<Value> {
        let (status, body) = self.send("GET", &format!("/api/v1/lessons?date={}", date), None, None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }

    pub async fn lesson_id(&self, date: NaiveDate, slot: &str) -> i64 {
        self.lessons_on(date).await
            .iter()
            .find(|l| l["time_slot"] == slot)
            .and_then(|l| l["id"].as_i64())
            .unwrap_or_else(|| panic!("no lesson on {} at {}", date, slot))
    }

    pub async fn book(&self, learner_id: i64, lesson_id: i64) -> (StatusCode, Value) {
        self.send("POST", &format!("/api/v1/lessons/{}/book", lesson_id), Some(("learner", learner_id)), None).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
