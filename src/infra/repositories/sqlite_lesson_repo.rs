use crate::domain::{
    models::lesson::{BatchOutcome, Lesson, LessonFilter, LessonSummary, ScheduleBatch},
    ports::LessonRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{SqlitePool, Row};

const SUMMARY_SELECT: &str = "SELECT l.*,
    (SELECT COUNT(*) FROM bookings b WHERE b.lesson_id = l.id AND b.booking_status = 'booked') AS booked_count,
    (SELECT COUNT(*) FROM bookings b WHERE b.lesson_id = l.id) AS booking_count
    FROM lessons l";

pub struct SqliteLessonRepo {
    pool: SqlitePool,
}

impl SqliteLessonRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LessonRepository for SqliteLessonRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lesson>, AppError> {
        sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_summary(&self, id: i64) -> Result<Option<LessonSummary>, AppError> {
        sqlx::query_as::<_, LessonSummary>(&format!("{} WHERE l.id = ?", SUMMARY_SELECT))
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn exists_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT id FROM lessons WHERE lesson_date >= ? AND lesson_date < ? LIMIT 1")
            .bind(start).bind(end).fetch_optional(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.is_some())
    }
    async fn list(&self, filter: &LessonFilter) -> Result<Vec<LessonSummary>, AppError> {
        sqlx::query_as::<_, LessonSummary>(&format!(
            "{} WHERE (?1 IS NULL OR l.lesson_date >= ?1)
               AND (?2 IS NULL OR l.lesson_date < ?2)
               AND (?3 IS NULL OR l.lesson_date = ?3)
               AND (?4 IS NULL OR l.coach_id = ?4)
               AND (?5 IS NULL OR l.grade_level = ?5)
             ORDER BY l.lesson_date ASC, l.time_slot ASC, l.id ASC",
            SUMMARY_SELECT
        ))
            .bind(filter.start).bind(filter.end).bind(filter.date).bind(filter.coach_id).bind(filter.grade)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn apply_batch(&self, batch: &ScheduleBatch) -> Result<BatchOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut outcome = BatchOutcome::default();
        for lesson in &batch.creates {
            let result = sqlx::query(
                "INSERT INTO lessons (day_of_week, time_slot, grade_level, coach_id, max_capacity, lesson_date)
                 VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT (lesson_date, time_slot, coach_id) DO NOTHING"
            )
                .bind(&lesson.day_of_week).bind(&lesson.time_slot).bind(lesson.grade_level)
                .bind(lesson.coach_id).bind(lesson.max_capacity).bind(lesson.lesson_date)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            outcome.created += result.rows_affected();
        }
        for change in &batch.reassignments {
            let result = sqlx::query(
                "UPDATE lessons SET coach_id = ? WHERE id = ? AND NOT EXISTS (SELECT 1 FROM bookings WHERE lesson_id = ?)"
            )
                .bind(change.coach_id).bind(change.lesson_id).bind(change.lesson_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            outcome.reassigned += result.rows_affected();
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(outcome)
    }
    async fn count_booked(&self, lesson_id: i64) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM bookings WHERE lesson_id = ? AND booking_status = 'booked'")
            .bind(lesson_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
