//! Booking rules as pure functions over entities.

use chrono::{Duration, NaiveDateTime};
use crate::domain::models::booking::{Booking, BookingStatus};
use crate::domain::models::learner::Learner;
use crate::domain::models::lesson::Lesson;
use crate::error::AppError;

pub fn check_eligibility(learner: &Learner, lesson: &Lesson) -> Result<(), AppError> {
    if !learner.can_book_grade(lesson.grade_level) {
        return Err(AppError::Eligibility(format!(
            "Learner at grade {} can only book grade {} or {} lessons",
            learner.current_grade, learner.current_grade, learner.current_grade + 1
        )));
    }
    Ok(())
}

pub fn check_capacity(lesson: &Lesson, booked: i64) -> Result<(), AppError> {
    if booked >= lesson.max_capacity as i64 {
        return Err(AppError::Capacity(format!("Lesson {} has no spaces left", lesson.id)));
    }
    Ok(())
}

/// Cancellation is allowed only while at least `notice` remains before the
/// lesson starts.
pub fn check_cancellation_window(
    lesson_start: NaiveDateTime,
    now: NaiveDateTime,
    notice: Duration,
) -> Result<(), AppError> {
    if lesson_start - now < notice {
        return Err(AppError::Window(format!(
            "Cannot cancel within {} hours of the lesson", notice.num_hours()
        )));
    }
    Ok(())
}

pub fn check_owner(booking: &Booking, actor_id: i64) -> Result<(), AppError> {
    if booking.learner_id != actor_id {
        return Err(AppError::Authorization("Booking belongs to another learner".into()));
    }
    Ok(())
}

/// Grade the learner should move to after attending, if any. A booking
/// promotes at most once.
pub fn promotion_on_attendance(booking: &Booking, learner: &Learner, lesson: &Lesson) -> Option<i32> {
    if lesson.grade_level > learner.current_grade && !booking.grade_updated {
        Some(lesson.grade_level)
    } else {
        None
    }
}

pub fn check_coach_owns_lesson(lesson: &Lesson, coach_id: i64) -> Result<(), AppError> {
    if lesson.coach_id != coach_id {
        return Err(AppError::Authorization(format!("Lesson {} is run by another coach", lesson.id)));
    }
    Ok(())
}

pub fn check_can_attend(booking: &Booking) -> Result<(), AppError> {
    if booking.status()? == BookingStatus::Cancelled {
        return Err(AppError::Validation("Cancelled bookings cannot be marked attended".into()));
    }
    Ok(())
}
