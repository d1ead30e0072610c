use kernel::model::{
    id::{FacilityId, MemberId, ReservationId},
    reservation::{Reservation, TimeSlot},
};
use shared::error::AppError;
use sqlx::types::chrono::{NaiveDate, NaiveDateTime};

// Shape shared by every reservation SELECT. `resv_money` is computed
// in SQL from the facility's hourly rate and the slot length; it is
// NULL when the facility row has been removed.
#[derive(Debug, sqlx::FromRow)]
pub struct ReservationRow {
    pub resv_id: ReservationId,
    pub member_id: MemberId,
    pub facility_id: FacilityId,
    pub resv_content: String,
    pub want_date: NaiveDate,
    pub resv_person_count: i32,
    pub resv_status: String,
    pub resv_start_time: NaiveDateTime,
    pub resv_end_time: NaiveDateTime,
    pub resv_money: Option<i32>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            resv_id,
            member_id,
            facility_id,
            resv_content,
            want_date,
            resv_person_count,
            resv_status,
            resv_start_time,
            resv_end_time,
            resv_money,
        } = value;
        Ok(Reservation {
            id: resv_id,
            member_id,
            facility_id,
            content: resv_content,
            want_date,
            person_count: resv_person_count,
            status: resv_status.parse()?,
            slot: TimeSlot {
                start: resv_start_time,
                end: resv_end_time,
            },
            amount: resv_money,
        })
    }
}
