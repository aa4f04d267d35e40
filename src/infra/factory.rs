use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, Clock, CoachRepository, LearnerRepository, LessonRepository, ReviewRepository,
    TemplateRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::calendar::Timetable;
use crate::domain::services::schedule_service::ScheduleService;
use crate::infra::clock::SystemClock;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_coach_repo::PostgresCoachRepo,
    postgres_learner_repo::PostgresLearnerRepo, postgres_lesson_repo::PostgresLessonRepo,
    postgres_review_repo::PostgresReviewRepo, postgres_template_repo::PostgresTemplateRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_coach_repo::SqliteCoachRepo,
    sqlite_learner_repo::SqliteLearnerRepo, sqlite_lesson_repo::SqliteLessonRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_template_repo::SqliteTemplateRepo,
};
use crate::state::AppState;

/// Repository set for one storage backend.
pub struct Repositories {
    pub coach_repo: Arc<dyn CoachRepository>,
    pub learner_repo: Arc<dyn LearnerRepository>,
    pub template_repo: Arc<dyn TemplateRepository>,
    pub lesson_repo: Arc<dyn LessonRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
}

impl Repositories {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            coach_repo: Arc::new(SqliteCoachRepo::new(pool.clone())),
            learner_repo: Arc::new(SqliteLearnerRepo::new(pool.clone())),
            template_repo: Arc::new(SqliteTemplateRepo::new(pool.clone())),
            lesson_repo: Arc::new(SqliteLessonRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            review_repo: Arc::new(SqliteReviewRepo::new(pool)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            coach_repo: Arc::new(PostgresCoachRepo::new(pool.clone())),
            learner_repo: Arc::new(PostgresLearnerRepo::new(pool.clone())),
            template_repo: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            lesson_repo: Arc::new(PostgresLessonRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            review_repo: Arc::new(PostgresReviewRepo::new(pool)),
        }
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Repositories::postgres(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Repositories::sqlite(pool)
    };

    build_state(config.clone(), repos, Arc::new(SystemClock))
}

/// Wires services over an already-built repository set.
pub fn build_state(config: Config, repos: Repositories, clock: Arc<dyn Clock>) -> AppState {
    let timetable = Arc::new(Timetable::standard());

    let schedule_service = Arc::new(ScheduleService::new(
        timetable.clone(),
        repos.coach_repo.clone(),
        repos.template_repo.clone(),
        repos.lesson_repo.clone(),
        config.lesson_capacity,
    ));
    let booking_service = Arc::new(BookingService::new(
        timetable.clone(),
        clock.clone(),
        repos.learner_repo.clone(),
        repos.lesson_repo.clone(),
        repos.booking_repo.clone(),
        repos.review_repo.clone(),
        chrono::Duration::hours(config.cancellation_notice_hours),
    ));

    AppState {
        config,
        timetable,
        clock,
        coach_repo: repos.coach_repo,
        learner_repo: repos.learner_repo,
        template_repo: repos.template_repo,
        lesson_repo: repos.lesson_repo,
        booking_repo: repos.booking_repo,
        review_repo: repos.review_repo,
        schedule_service,
        booking_service,
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
