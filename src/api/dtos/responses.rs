use chrono::NaiveDateTime;
use serde::Serialize;
use crate::domain::models::booking::{BookingHistory, BookingStatus};
use crate::domain::models::coach::Coach;
use crate::domain::models::learner::Learner;
use crate::domain::models::lesson::{Lesson, LessonSummary};
use crate::domain::services::calendar::Timetable;
use crate::domain::services::schedule_service::IntegrationReport;

#[derive(Serialize)]
pub struct CoachResponse {
    #[serde(flatten)]
    pub coach: Coach,
    pub average_rating: f64,
    pub review_count: usize,
}

#[derive(Serialize)]
pub struct CoachRegisteredResponse {
    pub coach: Coach,
    /// Absent when onboarding into the schedule failed; registration still
    /// stands.
    pub integration: Option<IntegrationReport>,
}

#[derive(Serialize)]
pub struct LessonResponse {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub starts_at: Option<NaiveDateTime>,
    pub booked_count: i64,
    pub available_spaces: i64,
    pub is_full: bool,
}

impl LessonResponse {
    pub fn from_summary(summary: LessonSummary, timetable: &Timetable) -> Self {
        let available_spaces = summary.available_spaces();
        let is_full = summary.is_full();
        Self {
            starts_at: timetable.lesson_start(&summary.lesson).ok(),
            booked_count: summary.booked_count,
            available_spaces,
            is_full,
            lesson: summary.lesson,
        }
    }
}

#[derive(Serialize)]
pub struct LearnerProfileResponse {
    #[serde(flatten)]
    pub learner: Learner,
    pub attended: usize,
    pub missed: usize,
    pub cancelled: usize,
    #[serde(flatten)]
    pub history: BookingHistory,
}

impl LearnerProfileResponse {
    pub fn new(learner: Learner, history: BookingHistory) -> Self {
        Self {
            attended: history.count_attended(),
            missed: history.count_past(BookingStatus::Missed),
            cancelled: history.count_past(BookingStatus::Cancelled),
            learner,
            history,
        }
    }
}

/// A coach's own lessons around today.
#[derive(Serialize)]
pub struct CoachClassesResponse {
    pub upcoming: Vec<LessonResponse>,
    pub past: Vec<LessonResponse>,
}
