use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_dir: String,
    /// Rolling window used by the calendar view and coach onboarding.
    pub schedule_weeks: u32,
    pub lesson_capacity: i32,
    pub cancellation_notice_hours: i64,
    pub maintenance_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
            schedule_weeks: env::var("SCHEDULE_WEEKS").unwrap_or_else(|_| "4".to_string()).parse().expect("SCHEDULE_WEEKS must be a number"),
            lesson_capacity: env::var("LESSON_CAPACITY").unwrap_or_else(|_| "4".to_string()).parse().expect("LESSON_CAPACITY must be a number"),
            cancellation_notice_hours: env::var("CANCELLATION_NOTICE_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("CANCELLATION_NOTICE_HOURS must be a number"),
            maintenance_interval_secs: env::var("MAINTENANCE_INTERVAL_SECS").unwrap_or_else(|_| "3600".to_string()).parse().expect("MAINTENANCE_INTERVAL_SECS must be a number"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://lessons.db".to_string(),
            port: 3000,
            log_dir: "./logs".to_string(),
            schedule_weeks: 4,
            lesson_capacity: 4,
            cancellation_notice_hours: 24,
            maintenance_interval_secs: 3600,
        }
    }
}
