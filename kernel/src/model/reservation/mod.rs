use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use shared::error::{AppError, AppResult};
use strum::{Display, EnumString};

use crate::model::id::{FacilityId, MemberId, ReservationId};

pub mod event;

// Wire formats for calendar dates and slot timestamps. Values are
// naive local time; nothing in this service converts timezones.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Parses a `YYYY-MM-DD` calendar date, rejecting impossible values
// such as month 13. chrono tolerates unpadded fields ("2025-9-20"),
// so the canonical zero-padded form is enforced by round-tripping.
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)?;
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(AppError::MalformedDateTimeError(format!(
            "date is not in YYYY-MM-DD form: {value}"
        )));
    }
    Ok(date)
}

fn parse_datetime(value: &str) -> AppResult<NaiveDateTime> {
    let datetime = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)?;
    if datetime.format(DATETIME_FORMAT).to_string() != value {
        return Err(AppError::MalformedDateTimeError(format!(
            "timestamp is not in YYYY-MM-DD HH:MM:SS form: {value}"
        )));
    }
    Ok(datetime)
}

// Only completed reservations occupy a slot. Requested ones are still
// unpaid and cancelled ones have released it, so neither blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    Requested,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_blocking(self) -> bool {
        matches!(self, ReservationStatus::Completed)
    }
}

// Half-open interval `[start, end)` on a facility's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::UnprocessableEntity(format!(
                "reservation must start before it ends: {start} >= {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_datetime(start)?, parse_datetime(end)?)
    }

    // Two half-open intervals intersect iff each starts before the
    // other ends; back-to-back slots share a boundary but not time.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub member_id: MemberId,
    pub facility_id: FacilityId,
    pub content: String,
    pub want_date: NaiveDate,
    pub person_count: i32,
    pub status: ReservationStatus,
    pub slot: TimeSlot,
    // Derived at read time from the facility's hourly rate, never stored.
    pub amount: Option<i32>,
}

// Partial update. Absent fields leave the stored value untouched; the
// adapter applies the same rule through COALESCE.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub content: Option<String>,
    pub person_count: Option<i32>,
    pub status: Option<ReservationStatus>,
}

impl ReservationPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.person_count.is_none() && self.status.is_none()
    }

    pub fn apply_to(&self, reservation: &mut Reservation) {
        if let Some(content) = &self.content {
            reservation.content = content.clone();
        }
        if let Some(person_count) = self.person_count {
            reservation.person_count = person_count;
        }
        if let Some(status) = self.status {
            reservation.status = status;
        }
    }
}
