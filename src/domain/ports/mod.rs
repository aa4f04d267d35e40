use crate::domain::models::{
    booking::{AttendanceMark, Booking, BookingDetail, NewBooking, RosterEntry},
    coach::{Coach, NewCoach},
    learner::{Learner, NewLearner},
    lesson::{BatchOutcome, Lesson, LessonFilter, LessonSummary, ScheduleBatch},
    review::{NewReview, Review},
    template::{LessonTemplate, NewLessonTemplate},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

/// Wall-clock source for window and cancellation checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[async_trait]
pub trait CoachRepository: Send + Sync {
    async fn create(&self, coach: &NewCoach) -> Result<Coach, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Coach>, AppError>;
    /// All coaches ordered by ascending id (join order).
    async fn list_by_join_order(&self) -> Result<Vec<Coach>, AppError>;
}

#[async_trait]
pub trait LearnerRepository: Send + Sync {
    async fn create(&self, learner: &NewLearner) -> Result<Learner, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Learner>, AppError>;
    async fn update_grade(&self, id: i64, grade: i32) -> Result<Learner, AppError>;
    /// Case-insensitive substring match on first name, last name or email,
    /// ordered by last then first name.
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Learner>, AppError>;
}

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: &NewLessonTemplate) -> Result<LessonTemplate, AppError>;
    async fn list(&self) -> Result<Vec<LessonTemplate>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lesson>, AppError>;
    async fn find_summary(&self, id: i64) -> Result<Option<LessonSummary>, AppError>;
    /// True when any lesson falls on a date in `[start, end)`.
    async fn exists_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<bool, AppError>;
    /// Lessons with seat usage, ordered by date then slot.
    async fn list(&self, filter: &LessonFilter) -> Result<Vec<LessonSummary>, AppError>;
    /// Inserts and reassignments committed atomically. Inserts that collide on
    /// (date, slot, coach) are skipped; reassignments only apply to lessons
    /// that still have no bookings at commit time.
    async fn apply_batch(&self, batch: &ScheduleBatch) -> Result<BatchOutcome, AppError>;
    async fn count_booked(&self, lesson_id: i64) -> Result<i64, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError>;
    async fn find_for_learner_lesson(&self, learner_id: i64, lesson_id: i64) -> Result<Option<Booking>, AppError>;
    /// Replaces any inactive record for the pair and inserts a `booked` row,
    /// re-validating capacity inside the same transaction.
    async fn create_booked(&self, booking: &NewBooking) -> Result<Booking, AppError>;
    async fn cancel(&self, id: i64) -> Result<Booking, AppError>;
    /// Marks every booking attended and applies any promotions in one
    /// transaction. Nothing is written if any mark fails.
    async fn mark_attended(&self, marks: &[AttendanceMark]) -> Result<Vec<Booking>, AppError>;
    async fn list_roster(&self, lesson_id: i64) -> Result<Vec<RosterEntry>, AppError>;
    async fn list_by_lesson(&self, lesson_id: i64) -> Result<Vec<Booking>, AppError>;
    async fn list_by_learner(&self, learner_id: i64) -> Result<Vec<BookingDetail>, AppError>;
    /// Reclassifies `booked` rows whose lesson date is before `today`.
    async fn mark_missed_before(&self, today: NaiveDate) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn upsert(&self, review: &NewReview) -> Result<Review, AppError>;
    async fn find_by_booking(&self, booking_id: i64) -> Result<Option<Review>, AppError>;
    /// Ratings left on attended bookings of the coach's lessons.
    async fn ratings_for_coach(&self, coach_id: i64) -> Result<Vec<i32>, AppError>;
}
