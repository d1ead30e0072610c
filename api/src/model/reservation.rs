use chrono::{NaiveDate, NaiveDateTime};
use garde::Validate;
use kernel::model::{
    id::{FacilityId, MemberId, ReservationId},
    reservation::{
        event::{CreateReservation, ReservationFilter},
        parse_date, Reservation, ReservationPatch, ReservationStatus, TimeSlot,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

// Slot timestamps travel as `YYYY-MM-DD HH:MM:SS` strings on the wire.
mod datetime_format {
    use chrono::NaiveDateTime;
    use kernel::model::reservation::DATETIME_FORMAT;
    use serde::Serializer;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 1))]
    pub member_id: String,
    #[garde(skip)]
    pub facility_id: i64,
    #[garde(skip)]
    pub content: String,
    // YYYY-MM-DD
    #[garde(skip)]
    pub want_date: String,
    #[garde(range(min = 1))]
    pub person_count: i32,
    // YYYY-MM-DD HH:MM:SS
    #[garde(skip)]
    pub start_time: String,
    #[garde(skip)]
    pub end_time: String,
}

impl TryFrom<CreateReservationRequest> for CreateReservation {
    type Error = AppError;

    fn try_from(value: CreateReservationRequest) -> Result<Self, Self::Error> {
        let CreateReservationRequest {
            member_id,
            facility_id,
            content,
            want_date,
            person_count,
            start_time,
            end_time,
        } = value;
        Ok(CreateReservation {
            member_id: MemberId::new(member_id),
            facility_id: FacilityId::new(facility_id),
            content,
            want_date: parse_date(&want_date)?,
            person_count,
            slot: TimeSlot::parse(&start_time, &end_time)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub content: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub person_count: Option<i32>,
    #[garde(skip)]
    pub status: Option<String>,
}

impl TryFrom<UpdateReservationRequest> for ReservationPatch {
    type Error = AppError;

    fn try_from(value: UpdateReservationRequest) -> Result<Self, Self::Error> {
        let UpdateReservationRequest {
            content,
            person_count,
            status,
        } = value;
        let status = status
            .map(|s| s.parse::<ReservationStatus>())
            .transpose()?;
        Ok(ReservationPatch {
            content,
            person_count,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub resv_id: Option<i64>,
    pub member_id: Option<String>,
    pub facility_id: Option<i64>,
}

impl From<ReservationListQuery> for ReservationFilter {
    fn from(value: ReservationListQuery) -> Self {
        let ReservationListQuery {
            resv_id,
            member_id,
            facility_id,
        } = value;
        ReservationFilter {
            id: resv_id.map(ReservationId::new),
            member_id: member_id.map(MemberId::new),
            facility_id: facility_id.map(FacilityId::new),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedTimesQuery {
    pub facility_id: i64,
    // YYYY-MM-DD
    pub want_date: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationResponse {
    pub reservation_id: ReservationId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRowsResponse {
    pub affected: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub member_id: MemberId,
    pub facility_id: FacilityId,
    pub content: String,
    pub want_date: NaiveDate,
    pub person_count: i32,
    pub status: ReservationStatus,
    #[serde(with = "datetime_format")]
    pub start_time: NaiveDateTime,
    #[serde(with = "datetime_format")]
    pub end_time: NaiveDateTime,
    pub amount: Option<i32>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            member_id,
            facility_id,
            content,
            want_date,
            person_count,
            status,
            slot,
            amount,
        } = value;
        Self {
            reservation_id: id,
            member_id,
            facility_id,
            content,
            want_date,
            person_count,
            status,
            start_time: slot.start,
            end_time: slot.end,
            amount,
        }
    }
}
