use std::sync::Arc;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use crate::domain::models::lesson::{Lesson, LessonFilter, LessonSummary, ScheduleBatch};
use crate::domain::models::template::{LessonTemplate, NewLessonTemplate};
use crate::domain::ports::{CoachRepository, LessonRepository, TemplateRepository};
use crate::domain::services::calendar::{window_end, Timetable};
use crate::domain::services::scheduler::{
    plan_coach_integration, plan_even_distribution, plan_template_expansion, validate_lesson_grade, SlotConflict,
};
use crate::error::AppError;

pub const MAX_WINDOW_WEEKS: u32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// The window already had lessons; nothing was written.
    AlreadyPopulated,
    NoCoaches,
    Expanded { created: u64 },
    Distributed { created: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationReport {
    pub created: u64,
    pub reassigned: u64,
    pub held_by_bookings: usize,
    pub conflicts: Vec<SlotConflict>,
}

impl IntegrationReport {
    pub fn mutations(&self) -> u64 {
        self.created + self.reassigned
    }
}

pub struct ScheduleService {
    timetable: Arc<Timetable>,
    coach_repo: Arc<dyn CoachRepository>,
    template_repo: Arc<dyn TemplateRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    lesson_capacity: i32,
}

impl ScheduleService {
    pub fn new(
        timetable: Arc<Timetable>,
        coach_repo: Arc<dyn CoachRepository>,
        template_repo: Arc<dyn TemplateRepository>,
        lesson_repo: Arc<dyn LessonRepository>,
        lesson_capacity: i32,
    ) -> Self {
        Self { timetable, coach_repo, template_repo, lesson_repo, lesson_capacity }
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Populates an empty window of `weeks` weeks from `start`. `weeks` must be
    /// 1 to 52, anything else is a `Validation` error. A window holding any
    /// lesson is left alone, even when only partly covered.
    pub async fn ensure_schedule(&self, start: NaiveDate, weeks: u32) -> Result<ScheduleOutcome, AppError> {
        check_weeks(weeks)?;
        let end = window_end(start, weeks);

        if self.lesson_repo.exists_in_range(start, end).await? {
            return Ok(ScheduleOutcome::AlreadyPopulated);
        }

        let coaches = self.coach_repo.list_by_join_order().await?;
        if coaches.is_empty() {
            info!("ensure_schedule: no coaches registered, skipping {}..{}", start, end);
            return Ok(ScheduleOutcome::NoCoaches);
        }

        if self.template_repo.count().await? > 0 {
            let created = self.expand_templates(start, weeks).await?;
            return Ok(ScheduleOutcome::Expanded { created });
        }

        let coach_ids: Vec<i64> = coaches.iter().map(|c| c.id).collect();
        let batch = ScheduleBatch {
            creates: plan_even_distribution(&self.timetable, start, weeks, &coach_ids, self.lesson_capacity),
            reassignments: Vec::new(),
        };
        let outcome = self.lesson_repo.apply_batch(&batch).await?;
        info!(
            "ensure_schedule: distributed {} lessons across {} coaches for {}..{}",
            outcome.created, coach_ids.len(), start, end
        );
        Ok(ScheduleOutcome::Distributed { created: outcome.created })
    }

    /// Expands every template over the window, skipping lessons that already
    /// exist. Returns the number of lessons created.
    pub async fn expand_templates(&self, start: NaiveDate, weeks: u32) -> Result<u64, AppError> {
        check_weeks(weeks)?;
        let templates = self.template_repo.list().await?;
        let existing = self.lessons_in_window(start, weeks).await?;
        let lessons: Vec<Lesson> = existing.into_iter().map(|s| s.lesson).collect();

        let creates = plan_template_expansion(&self.timetable, start, weeks, &templates, &lessons, self.lesson_capacity)?;
        if creates.is_empty() {
            return Ok(0);
        }
        let outcome = self.lesson_repo.apply_batch(&ScheduleBatch { creates, reassignments: Vec::new() }).await?;
        info!("expand_templates: {} templates produced {} lessons from {}", templates.len(), outcome.created, start);
        Ok(outcome.created)
    }

    /// Rebalances the window toward a rotation that includes every current
    /// coach. Lessons with bookings keep their coach; (date, slot) pairs with
    /// several lessons are reported and left alone.
    pub async fn integrate_new_coach(&self, coach_id: i64, start: NaiveDate, weeks: u32) -> Result<IntegrationReport, AppError> {
        check_weeks(weeks)?;
        self.coach_repo.find_by_id(coach_id).await?
            .ok_or(AppError::NotFound(format!("Coach {} not found", coach_id)))?;

        let coach_ids: Vec<i64> = self.coach_repo.list_by_join_order().await?
            .iter()
            .map(|c| c.id)
            .collect();
        let existing = self.lessons_in_window(start, weeks).await?;

        let plan = plan_coach_integration(&self.timetable, start, weeks, &coach_ids, &existing, self.lesson_capacity);
        for conflict in &plan.conflicts {
            warn!(
                "integrate_new_coach: {} lessons share {} {}, leaving them untouched",
                conflict.lesson_ids.len(), conflict.date, conflict.time_slot
            );
        }

        let outcome = if plan.batch.is_empty() {
            Default::default()
        } else {
            self.lesson_repo.apply_batch(&plan.batch).await?
        };

        info!(
            "integrate_new_coach: coach {} joined rotation of {}, created {}, reassigned {}, held {}",
            coach_id, coach_ids.len(), outcome.created, outcome.reassigned, plan.held_by_bookings
        );

        Ok(IntegrationReport {
            created: outcome.created,
            reassigned: outcome.reassigned,
            held_by_bookings: plan.held_by_bookings,
            conflicts: plan.conflicts,
        })
    }

    pub async fn create_template(&self, template: &NewLessonTemplate) -> Result<LessonTemplate, AppError> {
        self.timetable.validate(&template.day_of_week, &template.time_slot)?;
        validate_lesson_grade(template.grade_level)?;
        self.coach_repo.find_by_id(template.coach_id).await?
            .ok_or(AppError::NotFound(format!("Coach {} not found", template.coach_id)))?;

        let created = self.template_repo.create(template).await?;
        info!(
            "Template created: {} {} grade {} coach {}",
            created.day_of_week, created.time_slot, created.grade_level, created.coach_id
        );
        Ok(created)
    }

    async fn lessons_in_window(&self, start: NaiveDate, weeks: u32) -> Result<Vec<LessonSummary>, AppError> {
        self.lesson_repo.list(&LessonFilter {
            start: Some(start),
            end: Some(window_end(start, weeks)),
            ..Default::default()
        }).await
    }
}

fn check_weeks(weeks: u32) -> Result<(), AppError> {
    if weeks == 0 || weeks > MAX_WINDOW_WEEKS {
        return Err(AppError::Validation(format!("weeks must be between 1 and {}", MAX_WINDOW_WEEKS)));
    }
    Ok(())
}
