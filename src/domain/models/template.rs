use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// A recurring weekly rule expanded into concrete lessons.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LessonTemplate {
    pub id: i64,
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewLessonTemplate {
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
    pub created_at: NaiveDateTime,
}
