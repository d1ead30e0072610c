use crate::model::{
    id::{FacilityId, ReservationId},
    reservation::{
        event::{CreateReservation, DeleteReservation, ReservationFilter, UpdateReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Runs the member gate, the overlap check and the insert in one
    // serializable transaction and returns the fresh id.
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    // Returns the reservations matching every present filter field.
    async fn find_all(&self, filter: ReservationFilter) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // Applies the present patch fields to the member's own record and
    // returns the affected-row count. Ownership failures are merged
    // with not-found.
    async fn update(&self, event: UpdateReservation) -> AppResult<u64>;
    // Removes the member's own record and returns the affected-row count.
    async fn delete(&self, event: DeleteReservation) -> AppResult<u64>;
    // Completed reservations on one facility for one calendar date.
    async fn find_completed_by_facility_and_date(
        &self,
        facility_id: FacilityId,
        want_date: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;
}
