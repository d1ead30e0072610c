use chrono::NaiveDate;
use derive_new::new;

use crate::model::{
    id::{FacilityId, MemberId, ReservationId},
    reservation::{ReservationPatch, TimeSlot},
};

#[derive(new, Debug)]
pub struct CreateReservation {
    pub member_id: MemberId,
    pub facility_id: FacilityId,
    pub content: String,
    pub want_date: NaiveDate,
    pub person_count: i32,
    pub slot: TimeSlot,
}

#[derive(new, Debug)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub requested_member: MemberId,
    pub patch: ReservationPatch,
}

#[derive(new, Debug)]
pub struct DeleteReservation {
    pub reservation_id: ReservationId,
    pub requested_member: MemberId,
}

// Search conditions for the reservation list. Every field is optional
// and an empty filter matches all records.
#[derive(new, Debug, Default)]
pub struct ReservationFilter {
    pub id: Option<ReservationId>,
    pub member_id: Option<MemberId>,
    pub facility_id: Option<FacilityId>,
}
