use crate::domain::{models::coach::{Coach, NewCoach}, ports::CoachRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCoachRepo {
    pool: SqlitePool,
}

impl SqliteCoachRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoachRepository for SqliteCoachRepo {
    async fn create(&self, coach: &NewCoach) -> Result<Coach, AppError> {
        sqlx::query_as::<_, Coach>(
            "INSERT INTO coaches (first_name, last_name, email, phone, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&coach.first_name).bind(&coach.last_name).bind(&coach.email).bind(&coach.phone).bind(coach.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<Coach>, AppError> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_join_order(&self) -> Result<Vec<Coach>, AppError> {
        sqlx::query_as::<_, Coach>("SELECT * FROM coaches ORDER BY id ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
