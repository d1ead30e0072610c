use crate::model::reservation::{
    AffectedRowsResponse, CreateReservationRequest, CreatedReservationResponse,
    OccupiedTimesQuery, ReservationListQuery, ReservationResponse, ReservationsResponse,
    UpdateReservationRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::{FacilityId, MemberId, ReservationId},
    reservation::{
        event::{DeleteReservation, UpdateReservation},
        parse_date,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreatedReservationResponse>)> {
    req.validate(&())?;

    let reservation_id = registry
        .reservation_repository()
        .create(req.try_into()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationResponse { reservation_id }),
    ))
}

pub async fn show_reservation_list(
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_all(query.into())
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .and_then(|reservation| match reservation {
            Some(r) => Ok(Json(r.into())),
            None => Err(AppError::EntityNotFound(format!(
                "reservation ({reservation_id}) was not found"
            ))),
        })
}

// Completed reservations for one facility on one date, for the
// booking calendar to grey out.
pub async fn show_occupied_times(
    Query(query): Query<OccupiedTimesQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    let want_date = parse_date(&query.want_date)?;

    registry
        .reservation_repository()
        .find_completed_by_facility_and_date(FacilityId::new(query.facility_id), want_date)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn update_reservation(
    Path((member_id, reservation_id)): Path<(MemberId, ReservationId)>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateReservationRequest>,
) -> AppResult<Json<AffectedRowsResponse>> {
    req.validate(&())?;

    let event = UpdateReservation::new(reservation_id, member_id, req.try_into()?);
    registry
        .reservation_repository()
        .update(event)
        .await
        .map(|affected| Json(AffectedRowsResponse { affected }))
}

pub async fn delete_reservation(
    Path((member_id, reservation_id)): Path<(MemberId, ReservationId)>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AffectedRowsResponse>> {
    let event = DeleteReservation::new(reservation_id, member_id);
    registry
        .reservation_repository()
        .delete(event)
        .await
        .map(|affected| Json(AffectedRowsResponse { affected }))
}
