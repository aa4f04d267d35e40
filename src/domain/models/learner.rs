use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use sqlx::FromRow;

pub const MIN_GRADE: i32 = 0;
pub const MAX_GRADE: i32 = 5;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Learner {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_grade: i32,
    pub created_at: NaiveDateTime,
}

impl Learner {
    /// Learners may book their current grade or the next one up.
    pub fn can_book_grade(&self, lesson_grade: i32) -> bool {
        lesson_grade == self.current_grade || lesson_grade == self.current_grade + 1
    }
}

#[derive(Debug, Clone)]
pub struct NewLearner {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_grade: i32,
    pub created_at: NaiveDateTime,
}
