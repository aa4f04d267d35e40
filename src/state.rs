use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, Clock, CoachRepository, LearnerRepository, LessonRepository, ReviewRepository,
    TemplateRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::domain::services::calendar::Timetable;
use crate::domain::services::schedule_service::ScheduleService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub timetable: Arc<Timetable>,
    pub clock: Arc<dyn Clock>,
    pub coach_repo: Arc<dyn CoachRepository>,
    pub learner_repo: Arc<dyn LearnerRepository>,
    pub template_repo: Arc<dyn TemplateRepository>,
    pub lesson_repo: Arc<dyn LessonRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub schedule_service: Arc<ScheduleService>,
    pub booking_service: Arc<BookingService>,
}
