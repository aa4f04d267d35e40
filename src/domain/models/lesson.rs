use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: i64,
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
    pub max_capacity: i32,
    pub lesson_date: NaiveDate,
}

/// A lesson together with its live seat usage.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LessonSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lesson: Lesson,
    /// Rows with status `booked`; these hold a seat.
    pub booked_count: i64,
    /// Booking rows of any status; a lesson with any is never reassigned.
    pub booking_count: i64,
}

impl LessonSummary {
    pub fn available_spaces(&self) -> i64 {
        available_spaces(self.lesson.max_capacity, self.booked_count)
    }

    pub fn is_full(&self) -> bool {
        self.available_spaces() <= 0
    }
}

pub fn available_spaces(capacity: i32, booked: i64) -> i64 {
    capacity as i64 - booked
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
    pub max_capacity: i32,
    pub lesson_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reassignment {
    pub lesson_id: i64,
    pub coach_id: i64,
}

/// Lesson writes committed together in one transaction.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBatch {
    pub creates: Vec<NewLesson>,
    pub reassignments: Vec<Reassignment>,
}

impl ScheduleBatch {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.reassignments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub created: u64,
    pub reassigned: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub date: Option<NaiveDate>,
    pub coach_id: Option<i64>,
    pub grade: Option<i32>,
}
