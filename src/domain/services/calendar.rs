use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;
use crate::domain::models::lesson::Lesson;
use crate::error::AppError;

/// Grade taught in each slot when lessons are synthesized without templates.
const GRADE_BY_SLOT: [(&str, i32); 5] = [
    ("4-5pm", 1),
    ("5-6pm", 2),
    ("6-7pm", 3),
    ("2-3pm", 4),
    ("3-4pm", 5),
];

pub fn grade_for_slot(slot: &str) -> i32 {
    GRADE_BY_SLOT
        .iter()
        .find(|(label, _)| *label == slot)
        .map(|(_, grade)| *grade)
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(label: &str, start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            label: label.to_string(),
            start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub slots: Vec<TimeSlot>,
}

fn serialize_weekday<S: serde::Serializer>(weekday: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*weekday))
}

/// One concrete (date, day, slot) occurrence inside a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub slot: String,
}

/// Allowed days of the week and the ordered slots offered on each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    days: Vec<DaySchedule>,
}

impl Timetable {
    pub fn new(days: Vec<DaySchedule>) -> Self {
        Self { days }
    }

    /// Monday, Wednesday and Friday evenings plus Saturday afternoon.
    pub fn standard() -> Self {
        let weekday_slots = || vec![
            TimeSlot::new("4-5pm", (16, 0), (17, 0)),
            TimeSlot::new("5-6pm", (17, 0), (18, 0)),
            TimeSlot::new("6-7pm", (18, 0), (19, 0)),
        ];
        Self::new(vec![
            DaySchedule { weekday: Weekday::Mon, slots: weekday_slots() },
            DaySchedule { weekday: Weekday::Wed, slots: weekday_slots() },
            DaySchedule { weekday: Weekday::Fri, slots: weekday_slots() },
            DaySchedule {
                weekday: Weekday::Sat,
                slots: vec![
                    TimeSlot::new("2-3pm", (14, 0), (15, 0)),
                    TimeSlot::new("3-4pm", (15, 0), (16, 0)),
                ],
            },
        ])
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn slots_for(&self, weekday: Weekday) -> &[TimeSlot] {
        self.days
            .iter()
            .find(|d| d.weekday == weekday)
            .map(|d| d.slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_allowed(&self, weekday: Weekday, slot: &str) -> bool {
        self.slots_for(weekday).iter().any(|s| s.label == slot)
    }

    /// Checks a (day name, slot) pair against the timetable.
    pub fn validate(&self, day: &str, slot: &str) -> Result<Weekday, AppError> {
        let weekday = parse_weekday(day)?;
        if self.slots_for(weekday).is_empty() {
            return Err(AppError::Validation(format!("{} is not a lesson day", day)));
        }
        if !self.is_allowed(weekday, slot) {
            return Err(AppError::Validation(format!("Slot {} is not offered on {}", slot, day)));
        }
        Ok(weekday)
    }

    pub fn slot_interval(&self, slot: &str) -> Result<(NaiveTime, NaiveTime), AppError> {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .find(|s| s.label == slot)
            .map(|s| (s.start, s.end))
            .ok_or_else(|| AppError::Config(format!("Unknown time slot '{}'", slot)))
    }

    pub fn lesson_start(&self, lesson: &Lesson) -> Result<NaiveDateTime, AppError> {
        let (start, _) = self.slot_interval(&lesson.time_slot)?;
        Ok(lesson.lesson_date.and_time(start))
    }

    /// Every allowed (date, day, slot) occurrence with date in `[start, end)`,
    /// ordered by date then by slot declaration order.
    pub fn events(&self, start: NaiveDate, end: NaiveDate) -> Events<'_> {
        Events { timetable: self, cursor: start, end, slot_idx: 0 }
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lazy, restartable walk over a scheduling window.
#[derive(Debug, Clone)]
pub struct Events<'a> {
    timetable: &'a Timetable,
    cursor: NaiveDate,
    end: NaiveDate,
    slot_idx: usize,
}

impl Iterator for Events<'_> {
    type Item = ScheduledEvent;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.end {
            let weekday = self.cursor.weekday();
            let slots = self.timetable.slots_for(weekday);
            if let Some(slot) = slots.get(self.slot_idx) {
                self.slot_idx += 1;
                return Some(ScheduledEvent { date: self.cursor, weekday, slot: slot.label.clone() });
            }
            self.cursor += Duration::days(1);
            self.slot_idx = 0;
        }
        None
    }
}

pub fn next_on_or_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let delta = (weekday.num_days_from_monday() as i64 - date.weekday().num_days_from_monday() as i64).rem_euclid(7);
    date + Duration::days(delta)
}

/// Exclusive end of a window starting at `start`.
pub fn window_end(start: NaiveDate, weeks: u32) -> NaiveDate {
    start + Duration::weeks(weeks as i64)
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_weekday(day: &str) -> Result<Weekday, AppError> {
    match day {
        "Monday" => Ok(Weekday::Mon),
        "Tuesday" => Ok(Weekday::Tue),
        "Wednesday" => Ok(Weekday::Wed),
        "Thursday" => Ok(Weekday::Thu),
        "Friday" => Ok(Weekday::Fri),
        "Saturday" => Ok(Weekday::Sat),
        "Sunday" => Ok(Weekday::Sun),
        other => Err(AppError::Validation(format!("Unknown day of week '{}'", other))),
    }
}
