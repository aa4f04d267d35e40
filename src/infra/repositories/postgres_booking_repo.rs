use crate::domain::{
    models::booking::{AttendanceMark, Booking, BookingDetail, NewBooking, RosterEntry},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lost_race(e: sqlx::Error) -> AppError {
    let err = AppError::Database(e);
    if err.is_unique_violation() {
        return AppError::Capacity("Seat was taken by a concurrent booking".into());
    }
    err
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_for_learner_lesson(&self, learner_id: i64, lesson_id: i64) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE learner_id = $1 AND lesson_id = $2")
            .bind(learner_id).bind(lesson_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn create_booked(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the lesson serialises concurrent bookings for it.
        let lesson = sqlx::query("SELECT max_capacity FROM lessons WHERE id = $1 FOR UPDATE")
            .bind(booking.lesson_id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound(format!("Lesson {} not found", booking.lesson_id)))?;
        let capacity: i32 = lesson.get("max_capacity");

        sqlx::query("DELETE FROM bookings WHERE learner_id = $1 AND lesson_id = $2 AND booking_status != 'booked'")
            .bind(booking.learner_id).bind(booking.lesson_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let booked: i64 = sqlx::query("SELECT COUNT(*) AS count FROM bookings WHERE lesson_id = $1 AND booking_status = 'booked'")
            .bind(booking.lesson_id).fetch_one(&mut *tx).await.map_err(AppError::Database)?
            .get("count");
        if booked >= capacity as i64 {
            return Err(AppError::Capacity(format!("Lesson {} has no spaces left", booking.lesson_id)));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (learner_id, lesson_id, booking_status, booking_date, attended, grade_updated)
             VALUES ($1, $2, 'booked', $3, FALSE, FALSE) RETURNING *"
        )
            .bind(booking.learner_id).bind(booking.lesson_id).bind(booking.booked_at)
            .fetch_one(&mut *tx).await.map_err(lost_race)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn cancel(&self, id: i64) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET booking_status = 'cancelled' WHERE id = $1 RETURNING *")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound(format!("Booking {} not found", id)))
    }
    async fn mark_attended(&self, marks: &[AttendanceMark]) -> Result<Vec<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut updated = Vec::with_capacity(marks.len());
        for mark in marks {
            let booking = sqlx::query_as::<_, Booking>(
                "UPDATE bookings SET attended = TRUE, booking_status = 'attended', grade_updated = (grade_updated OR $1)
                 WHERE id = $2 AND booking_status <> 'cancelled' RETURNING *"
            )
                .bind(mark.promote_to.is_some()).bind(mark.booking_id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
                .ok_or(AppError::Validation(format!("Booking {} cannot be marked attended", mark.booking_id)))?;

            if let Some(grade) = mark.promote_to {
                sqlx::query("UPDATE learners SET current_grade = $1 WHERE id = $2 AND current_grade < $1")
                    .bind(grade).bind(mark.learner_id)
                    .execute(&mut *tx).await.map_err(AppError::Database)?;
            }
            updated.push(booking);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
    async fn list_roster(&self, lesson_id: i64) -> Result<Vec<RosterEntry>, AppError> {
        sqlx::query_as::<_, RosterEntry>(
            "SELECT b.id AS booking_id, b.learner_id, le.first_name, le.last_name, le.current_grade, b.booking_date
             FROM bookings b JOIN learners le ON le.id = b.learner_id
             WHERE b.lesson_id = $1 AND b.booking_status = 'booked'
             ORDER BY LOWER(le.last_name), LOWER(le.first_name)"
        )
            .bind(lesson_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_lesson(&self, lesson_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE lesson_id = $1 ORDER BY id ASC")
            .bind(lesson_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_learner(&self, learner_id: i64) -> Result<Vec<BookingDetail>, AppError> {
        sqlx::query_as::<_, BookingDetail>(
            "SELECT b.*, l.lesson_date, l.day_of_week, l.time_slot, l.grade_level, l.coach_id
             FROM bookings b JOIN lessons l ON l.id = b.lesson_id
             WHERE b.learner_id = $1
             ORDER BY l.lesson_date ASC, l.time_slot ASC"
        )
            .bind(learner_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn mark_missed_before(&self, today: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE bookings SET booking_status = 'missed'
             WHERE booking_status = 'booked' AND lesson_id IN (SELECT id FROM lessons WHERE lesson_date < $1)"
        )
            .bind(today).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
