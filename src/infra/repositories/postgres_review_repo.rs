use crate::domain::{models::review::{NewReview, Review}, ports::ReviewRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresReviewRepo {
    pool: PgPool,
}

impl PostgresReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepo {
    async fn upsert(&self, review: &NewReview) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (booking_id, rating, comment, review_date) VALUES ($1, $2, $3, $4)
             ON CONFLICT (booking_id) DO UPDATE SET
                rating = EXCLUDED.rating, comment = EXCLUDED.comment, review_date = EXCLUDED.review_date
             RETURNING *"
        )
            .bind(review.booking_id).bind(review.rating).bind(&review.comment).bind(review.review_date)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<Review>, AppError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE booking_id = $1")
            .bind(booking_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn ratings_for_coach(&self, coach_id: i64) -> Result<Vec<i32>, AppError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT r.rating FROM reviews r
             JOIN bookings b ON b.id = r.booking_id
             JOIN lessons l ON l.id = b.lesson_id
             WHERE l.coach_id = $1 AND b.attended = TRUE"
        )
            .bind(coach_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
