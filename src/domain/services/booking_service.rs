use std::sync::Arc;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;
use crate::domain::models::booking::{AttendanceMark, Booking, BookingStatus, NewBooking, RosterEntry};
use crate::domain::models::learner::Learner;
use crate::domain::models::lesson::{Lesson, LessonSummary};
use crate::domain::models::review::{is_valid_rating, NewReview, Review};
use crate::domain::ports::{BookingRepository, Clock, LearnerRepository, LessonRepository, ReviewRepository};
use crate::domain::services::calendar::Timetable;
use crate::domain::services::rules;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResult {
    pub booking: Booking,
    pub promoted_to: Option<i32>,
}

pub struct BookingService {
    timetable: Arc<Timetable>,
    clock: Arc<dyn Clock>,
    learner_repo: Arc<dyn LearnerRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    cancellation_notice: Duration,
}

impl BookingService {
    pub fn new(
        timetable: Arc<Timetable>,
        clock: Arc<dyn Clock>,
        learner_repo: Arc<dyn LearnerRepository>,
        lesson_repo: Arc<dyn LessonRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        cancellation_notice: Duration,
    ) -> Self {
        Self { timetable, clock, learner_repo, lesson_repo, booking_repo, review_repo, cancellation_notice }
    }

    /// Books a seat. Re-booking a lesson that is already booked returns the
    /// live booking unchanged; a cancelled or attended record is replaced.
    pub async fn book(&self, learner_id: i64, lesson_id: i64) -> Result<Booking, AppError> {
        let learner = self.find_learner(learner_id).await?;
        let lesson = self.find_lesson(lesson_id).await?;

        rules::check_eligibility(&learner, &lesson)?;

        if self.timetable.lesson_start(&lesson)? <= self.clock.now() {
            return Err(AppError::Validation("Cannot book a lesson that has already started".into()));
        }

        if let Some(existing) = self.booking_repo.find_for_learner_lesson(learner_id, lesson_id).await?
            && existing.status()? == BookingStatus::Booked {
            info!("book: learner {} already holds lesson {}", learner_id, lesson_id);
            return Ok(existing);
        }

        let booked = self.lesson_repo.count_booked(lesson_id).await?;
        rules::check_capacity(&lesson, booked)?;

        let created = self.booking_repo.create_booked(&NewBooking {
            learner_id,
            lesson_id,
            booked_at: self.clock.now(),
        }).await?;
        info!("Booking confirmed: {} learner {} lesson {}", created.id, learner_id, lesson_id);
        Ok(created)
    }

    pub async fn cancel(&self, booking_id: i64, actor_id: i64) -> Result<Booking, AppError> {
        let booking = self.find_booking(booking_id).await?;
        rules::check_owner(&booking, actor_id)?;

        match booking.status()? {
            BookingStatus::Cancelled => return Ok(booking),
            BookingStatus::Booked => {}
            other => return Err(AppError::Validation(format!("A booking that is {} cannot be cancelled", other))),
        }

        let lesson = self.find_lesson(booking.lesson_id).await?;
        let start = self.timetable.lesson_start(&lesson)?;
        rules::check_cancellation_window(start, self.clock.now(), self.cancellation_notice)?;

        let cancelled = self.booking_repo.cancel(booking.id).await?;
        info!("Booking cancelled: {} by learner {}", cancelled.id, actor_id);
        Ok(cancelled)
    }

    /// Records attendance and promotes the learner to the lesson grade when
    /// it is higher, at most once per booking.
    pub async fn mark_attended(&self, booking_id: i64) -> Result<AttendanceResult, AppError> {
        let booking = self.find_booking(booking_id).await?;
        let lesson = self.find_lesson(booking.lesson_id).await?;
        let mut results = self.apply_attendance(&lesson, vec![booking]).await?;
        results.pop().ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Attendance submitted by a coach for their own lesson. Every booking is
    /// checked before any is written, so a rejected form changes nothing.
    pub async fn record_attendance(
        &self,
        coach_id: i64,
        lesson_id: i64,
        booking_ids: &[i64],
    ) -> Result<Vec<AttendanceResult>, AppError> {
        let lesson = self.find_lesson(lesson_id).await?;
        rules::check_coach_owns_lesson(&lesson, coach_id)?;

        let on_lesson = self.booking_repo.list_by_lesson(lesson_id).await?;
        let mut selected = Vec::with_capacity(booking_ids.len());
        for booking_id in booking_ids {
            if selected.iter().any(|b: &Booking| b.id == *booking_id) {
                continue;
            }
            let booking = on_lesson.iter().find(|b| b.id == *booking_id)
                .ok_or(AppError::Validation(format!("Booking {} is not on lesson {}", booking_id, lesson_id)))?;
            selected.push(booking.clone());
        }
        self.apply_attendance(&lesson, selected).await
    }

    async fn apply_attendance(&self, lesson: &Lesson, bookings: Vec<Booking>) -> Result<Vec<AttendanceResult>, AppError> {
        let mut marks = Vec::with_capacity(bookings.len());
        for booking in &bookings {
            rules::check_can_attend(booking)?;
            let learner = self.find_learner(booking.learner_id).await?;
            marks.push(AttendanceMark {
                booking_id: booking.id,
                learner_id: learner.id,
                promote_to: rules::promotion_on_attendance(booking, &learner, lesson),
            });
        }

        let updated = self.booking_repo.mark_attended(&marks).await?;
        Ok(updated.into_iter().zip(marks).map(|(booking, mark)| {
            if let Some(grade) = mark.promote_to {
                info!("Learner {} promoted to grade {} via booking {}", mark.learner_id, grade, booking.id);
            }
            AttendanceResult { booking, promoted_to: mark.promote_to }
        }).collect())
    }

    pub async fn roster(&self, coach_id: i64, lesson_id: i64) -> Result<Vec<RosterEntry>, AppError> {
        let lesson = self.find_lesson(lesson_id).await?;
        rules::check_coach_owns_lesson(&lesson, coach_id)?;
        self.booking_repo.list_roster(lesson_id).await
    }

    pub async fn lesson_summary(&self, lesson_id: i64) -> Result<LessonSummary, AppError> {
        self.lesson_repo.find_summary(lesson_id).await?
            .ok_or(AppError::NotFound(format!("Lesson {} not found", lesson_id)))
    }

    pub async fn available_spaces(&self, lesson_id: i64) -> Result<i64, AppError> {
        Ok(self.lesson_summary(lesson_id).await?.available_spaces())
    }

    pub async fn is_full(&self, lesson_id: i64) -> Result<bool, AppError> {
        Ok(self.lesson_summary(lesson_id).await?.is_full())
    }

    /// Marks every still-booked seat on a lesson dated before `today` as missed.
    pub async fn sweep_missed(&self, today: NaiveDate) -> Result<u64, AppError> {
        let swept = self.booking_repo.mark_missed_before(today).await?;
        if swept > 0 {
            info!("Marked {} bookings before {} as missed", swept, today);
        }
        Ok(swept)
    }

    /// Reviews are left by the booking's learner once the lesson date has come.
    /// Submitting again replaces the earlier rating and comment.
    pub async fn submit_review(
        &self,
        actor_id: i64,
        booking_id: i64,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, AppError> {
        let booking = self.find_booking(booking_id).await?;
        rules::check_owner(&booking, actor_id)?;

        let lesson = self.find_lesson(booking.lesson_id).await?;
        if lesson.lesson_date > self.clock.today() {
            return Err(AppError::Validation("Lessons can be reviewed after they take place".into()));
        }
        if !is_valid_rating(rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }

        let comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self.review_repo.upsert(&NewReview {
            booking_id,
            rating,
            comment,
            review_date: self.clock.now(),
        }).await
    }

    async fn find_learner(&self, id: i64) -> Result<Learner, AppError> {
        self.learner_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound(format!("Learner {} not found", id)))
    }

    async fn find_lesson(&self, id: i64) -> Result<Lesson, AppError> {
        self.lesson_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound(format!("Lesson {} not found", id)))
    }

    async fn find_booking(&self, id: i64) -> Result<Booking, AppError> {
        self.booking_repo.find_by_id(id).await?
            .ok_or(AppError::NotFound(format!("Booking {} not found", id)))
    }
}
