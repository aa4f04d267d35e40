use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Review {
    pub id: i64,
    pub booking_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub review_date: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub review_date: NaiveDateTime,
}

pub fn is_valid_rating(rating: i32) -> bool {
    (1..=5).contains(&rating)
}

/// Mean rating rounded to two decimals, 0 when there are no ratings.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}
