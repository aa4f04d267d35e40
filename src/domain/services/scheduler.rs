//! Pure planning for lesson generation. Nothing here touches the store: each
//! planner takes the current state and returns the writes to commit.

use std::collections::{HashMap, HashSet};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use crate::domain::models::lesson::{Lesson, LessonSummary, NewLesson, Reassignment, ScheduleBatch};
use crate::domain::models::template::LessonTemplate;
use crate::domain::services::calendar::{grade_for_slot, next_on_or_after, weekday_name, window_end, ScheduledEvent, Timetable};
use crate::error::AppError;

pub const MIN_LESSON_GRADE: i32 = 1;
pub const MAX_LESSON_GRADE: i32 = 5;

/// Pairs each event in the window with its round-robin coach.
/// `coach_ids` must be in join order.
pub fn rotation<'a>(
    timetable: &'a Timetable,
    start: NaiveDate,
    weeks: u32,
    coach_ids: &'a [i64],
) -> impl Iterator<Item = (ScheduledEvent, i64)> + 'a {
    timetable
        .events(start, window_end(start, weeks))
        .enumerate()
        .filter_map(move |(idx, event)| {
            if coach_ids.is_empty() {
                None
            } else {
                Some((event, coach_ids[idx % coach_ids.len()]))
            }
        })
}

fn lesson_for_event(event: &ScheduledEvent, coach_id: i64, capacity: i32) -> NewLesson {
    NewLesson {
        day_of_week: weekday_name(event.weekday).to_string(),
        time_slot: event.slot.clone(),
        grade_level: grade_for_slot(&event.slot),
        coach_id,
        max_capacity: capacity,
        lesson_date: event.date,
    }
}

/// One lesson per (date, slot) in the window, coaches assigned round-robin.
pub fn plan_even_distribution(
    timetable: &Timetable,
    start: NaiveDate,
    weeks: u32,
    coach_ids: &[i64],
    capacity: i32,
) -> Vec<NewLesson> {
    rotation(timetable, start, weeks, coach_ids)
        .map(|(event, coach_id)| lesson_for_event(&event, coach_id, capacity))
        .collect()
}

/// Weekly occurrences of every template in the window that do not already
/// exist as a lesson for the same (date, slot, coach).
///
/// All templates are validated before anything is planned, so a single bad
/// rule rejects the whole expansion.
pub fn plan_template_expansion(
    timetable: &Timetable,
    start: NaiveDate,
    weeks: u32,
    templates: &[LessonTemplate],
    existing: &[Lesson],
    capacity: i32,
) -> Result<Vec<NewLesson>, AppError> {
    let mut rules = Vec::with_capacity(templates.len());
    for template in templates {
        let weekday = timetable.validate(&template.day_of_week, &template.time_slot)?;
        validate_lesson_grade(template.grade_level)?;
        rules.push((weekday, template));
    }

    let end = window_end(start, weeks);
    let mut seen: HashSet<(NaiveDate, &str, i64)> = existing
        .iter()
        .map(|l| (l.lesson_date, l.time_slot.as_str(), l.coach_id))
        .collect();

    let mut planned = Vec::new();
    for (weekday, template) in rules {
        let mut current = next_on_or_after(start, weekday);
        while current < end {
            if seen.insert((current, template.time_slot.as_str(), template.coach_id)) {
                planned.push(NewLesson {
                    day_of_week: weekday_name(weekday).to_string(),
                    time_slot: template.time_slot.clone(),
                    grade_level: template.grade_level,
                    coach_id: template.coach_id,
                    max_capacity: capacity,
                    lesson_date: current,
                });
            }
            current += Duration::days(7);
        }
    }
    Ok(planned)
}

pub fn validate_lesson_grade(grade: i32) -> Result<(), AppError> {
    if !(MIN_LESSON_GRADE..=MAX_LESSON_GRADE).contains(&grade) {
        return Err(AppError::Validation(format!(
            "Grade level must be between {} and {}", MIN_LESSON_GRADE, MAX_LESSON_GRADE
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotConflict {
    pub date: NaiveDate,
    pub time_slot: String,
    pub lesson_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationPlan {
    pub batch: ScheduleBatch,
    /// (date, slot) pairs holding more than one lesson; left untouched.
    pub conflicts: Vec<SlotConflict>,
    /// Lessons that should move to another coach but already have bookings.
    pub held_by_bookings: usize,
}

/// Re-targets the window toward the round-robin assignment for the current
/// roster. Lessons with any booking row keep their coach.
pub fn plan_coach_integration(
    timetable: &Timetable,
    start: NaiveDate,
    weeks: u32,
    coach_ids: &[i64],
    existing: &[LessonSummary],
    capacity: i32,
) -> IntegrationPlan {
    let mut by_slot: HashMap<(NaiveDate, &str), Vec<&LessonSummary>> = HashMap::new();
    for summary in existing {
        by_slot
            .entry((summary.lesson.lesson_date, summary.lesson.time_slot.as_str()))
            .or_default()
            .push(summary);
    }

    let mut plan = IntegrationPlan::default();
    for (event, desired) in rotation(timetable, start, weeks, coach_ids) {
        match by_slot.get(&(event.date, event.slot.as_str())).map(Vec::as_slice) {
            None | Some([]) => plan.batch.creates.push(lesson_for_event(&event, desired, capacity)),
            Some([only]) => {
                if only.lesson.coach_id == desired {
                    continue;
                }
                if only.booking_count == 0 {
                    plan.batch.reassignments.push(Reassignment { lesson_id: only.lesson.id, coach_id: desired });
                } else {
                    plan.held_by_bookings += 1;
                }
            }
            Some(many) => plan.conflicts.push(SlotConflict {
                date: event.date,
                time_slot: event.slot.clone(),
                lesson_ids: many.iter().map(|s| s.lesson.id).collect(),
            }),
        }
    }
    plan
}
