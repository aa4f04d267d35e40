use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
    Attended,
    Missed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Attended => "attended",
            BookingStatus::Missed => "missed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(BookingStatus::Booked),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "attended" => Ok(BookingStatus::Attended),
            "missed" => Ok(BookingStatus::Missed),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: i64,
    pub learner_id: i64,
    pub lesson_id: i64,
    pub booking_status: String,
    pub booking_date: NaiveDateTime,
    pub attended: bool,
    pub grade_updated: bool,
}

impl Booking {
    /// Stored status; a value outside the known set is a data error.
    pub fn status(&self) -> Result<BookingStatus, AppError> {
        self.booking_status.parse().map_err(|e| AppError::Config(format!("Booking {}: {}", self.id, e)))
    }

    pub fn is_status(&self, status: BookingStatus) -> bool {
        self.status().is_ok_and(|s| s == status)
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub learner_id: i64,
    pub lesson_id: i64,
    pub booked_at: NaiveDateTime,
}

/// Booking joined with the lesson it belongs to.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub lesson_date: NaiveDate,
    pub day_of_week: String,
    pub time_slot: String,
    pub grade_level: i32,
    pub coach_id: i64,
}

/// One attendance write: the booking and the grade its learner moves to, if any.
#[derive(Debug, Clone, Copy)]
pub struct AttendanceMark {
    pub booking_id: i64,
    pub learner_id: i64,
    pub promote_to: Option<i32>,
}

/// A learner's bookings split at `today`: live seats on lessons from today on,
/// and every booking on an earlier lesson.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingHistory {
    pub upcoming: Vec<BookingDetail>,
    pub past: Vec<BookingDetail>,
}

impl BookingHistory {
    /// `details` must be ordered by lesson date then slot. Past bookings come
    /// back newest first, at most `past_limit` of them.
    pub fn split(details: Vec<BookingDetail>, today: NaiveDate, past_limit: usize) -> Self {
        let (mut past, upcoming): (Vec<_>, Vec<_>) = details.into_iter().partition(|d| d.lesson_date < today);
        past.reverse();
        past.truncate(past_limit);
        Self {
            upcoming: upcoming.into_iter().filter(|d| d.booking.is_status(BookingStatus::Booked)).collect(),
            past,
        }
    }

    pub fn count_past(&self, status: BookingStatus) -> usize {
        self.past.iter().filter(|d| d.booking.is_status(status)).count()
    }

    /// Past lessons marked attended, by status or by flag.
    pub fn count_attended(&self) -> usize {
        self.past
            .iter()
            .filter(|d| d.booking.attended || d.booking.is_status(BookingStatus::Attended))
            .count()
    }
}

/// One seat on a lesson roster.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RosterEntry {
    pub booking_id: i64,
    pub learner_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub current_grade: i32,
    pub booking_date: NaiveDateTime,
}
