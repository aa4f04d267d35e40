use crate::domain::{models::learner::{Learner, NewLearner}, ports::LearnerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use crate::infra::repositories::like_pattern;
use sqlx::PgPool;

pub struct PostgresLearnerRepo {
    pool: PgPool,
}

impl PostgresLearnerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearnerRepository for PostgresLearnerRepo {
    async fn create(&self, learner: &NewLearner) -> Result<Learner, AppError> {
        sqlx::query_as::<_, Learner>(
            "INSERT INTO learners (first_name, last_name, email, current_grade, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&learner.first_name).bind(&learner.last_name).bind(&learner.email).bind(learner.current_grade).bind(learner.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: i64) -> Result<Option<Learner>, AppError> {
        sqlx::query_as::<_, Learner>("SELECT * FROM learners WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_grade(&self, id: i64, grade: i32) -> Result<Learner, AppError> {
        sqlx::query_as::<_, Learner>("UPDATE learners SET current_grade = $1 WHERE id = $2 RETURNING *")
            .bind(grade).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound(format!("Learner {} not found", id)))
    }
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Learner>, AppError> {
        sqlx::query_as::<_, Learner>(
            "SELECT * FROM learners
             WHERE first_name ILIKE $1 ESCAPE '\\' OR last_name ILIKE $1 ESCAPE '\\' OR email ILIKE $1 ESCAPE '\\'
             ORDER BY LOWER(last_name), LOWER(first_name), id
             LIMIT $2"
        )
            .bind(like_pattern(term)).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
