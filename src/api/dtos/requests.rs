use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RegisterCoachRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
}

impl RegisterCoachRequest {
    /// Trims names and phone, lowercases the email.
    pub fn normalize(&mut self) {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.take().map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterLearnerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 0, max = 5))]
    pub current_grade: Option<i32>,
}

impl RegisterLearnerRequest {
    pub fn normalize(&mut self) {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateGradeRequest {
    #[validate(range(min = 0, max = 5))]
    pub grade: i32,
}

#[derive(Deserialize, Default)]
pub struct LearnerSearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
}

/// Window parameters; omitted fields fall back to today and the configured
/// number of weeks.
#[derive(Deserialize, Default)]
pub struct ScheduleWindowRequest {
    pub start: Option<NaiveDate>,
    pub weeks: Option<u32>,
}

#[derive(Deserialize, Default)]
pub struct LessonQuery {
    pub date: Option<NaiveDate>,
    pub coach_id: Option<i64>,
    pub grade: Option<i32>,
}

#[derive(Deserialize)]
pub struct AttendanceRequest {
    pub booking_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}
