use crate::domain::{models::template::{LessonTemplate, NewLessonTemplate}, ports::TemplateRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresTemplateRepo {
    pool: PgPool,
}

impl PostgresTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepo {
    async fn create(&self, template: &NewLessonTemplate) -> Result<LessonTemplate, AppError> {
        sqlx::query_as::<_, LessonTemplate>(
            "INSERT INTO lesson_templates (day_of_week, time_slot, grade_level, coach_id, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&template.day_of_week).bind(&template.time_slot).bind(template.grade_level).bind(template.coach_id).bind(template.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<LessonTemplate>, AppError> {
        sqlx::query_as::<_, LessonTemplate>("SELECT * FROM lesson_templates ORDER BY id ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn count(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM lesson_templates").fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
