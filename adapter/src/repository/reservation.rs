use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;

use chrono::NaiveDate;
use derive_new::new;
use kernel::model::id::{FacilityId, MemberId, ReservationId};
use kernel::model::reservation::{
    event::{CreateReservation, DeleteReservation, ReservationFilter, UpdateReservation},
    Reservation, ReservationStatus,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

// Column list shared by every reservation SELECT. `resv_money` is the
// facility's hourly rate times the reserved whole hours; the LEFT JOIN
// keeps reservations readable even if the facility row is gone.
const SELECT_RESERVATION: &str = r#"
    SELECT
        r.resv_id,
        r.member_id,
        r.facility_id,
        r.resv_content,
        r.want_date,
        r.resv_person_count,
        r.resv_status,
        r.resv_start_time,
        r.resv_end_time,
        (
            f.facility_money
            * (EXTRACT(EPOCH FROM (r.resv_end_time - r.resv_start_time))::BIGINT / 3600)
        )::INT AS resv_money
    FROM reservations AS r
    LEFT JOIN facilities AS f ON r.facility_id = f.facility_id
"#;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // The member gate, the overlap check and the INSERT below must
        // see one consistent snapshot, otherwise a reservation being
        // completed concurrently could slip past the check.
        self.set_transaction_serializable(&mut tx).await?;

        // Pre-checks before touching the reservations table:
        // - does the requesting member exist?
        // - is the wanted slot free of completed reservations?
        {
            let member_exists: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS (SELECT 1 FROM members WHERE member_id = $1)
                "#,
            )
            .bind(event.member_id.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if !member_exists {
                return Err(AppError::EntityNotFound(format!(
                    "member ({}) was not found",
                    event.member_id
                )));
            }

            // Overlap condition for half-open slots:
            //     existing.start < new.end AND new.start < existing.end
            // Only completed reservations block; requested and
            // cancelled rows never hold the slot.
            let blocking: Option<ReservationId> = sqlx::query_scalar(
                r#"
                SELECT resv_id
                FROM reservations
                WHERE facility_id = $1
                  AND resv_status = $2
                  AND resv_start_time < $4
                  AND $3 < resv_end_time
                LIMIT 1
                "#,
            )
            .bind(event.facility_id)
            .bind(ReservationStatus::Completed.to_string())
            .bind(event.slot.start)
            .bind(event.slot.end)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if blocking.is_some() {
                return Err(AppError::ReservationConflict(format!(
                    "facility ({}) is already reserved between {} and {}",
                    event.facility_id, event.slot.start, event.slot.end
                )));
            }
        }

        // Fresh reservations always enter as `requested`; they only
        // start blocking the slot once a later update completes them.
        let reservation_id: ReservationId = sqlx::query_scalar(
            r#"
            INSERT INTO reservations
                (member_id, facility_id, resv_content, want_date,
                 resv_person_count, resv_status, resv_start_time, resv_end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING resv_id
            "#,
        )
        .bind(event.member_id.as_str())
        .bind(event.facility_id)
        .bind(&event.content)
        .bind(event.want_date)
        .bind(event.person_count)
        .bind(ReservationStatus::Requested.to_string())
        .bind(event.slot.start)
        .bind(event.slot.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation_id)
    }

    async fn find_all(&self, filter: ReservationFilter) -> AppResult<Vec<Reservation>> {
        // NULL-tolerant WHERE clause: an absent condition matches
        // every row, so the one statement serves all filter shapes.
        let sql = format!(
            r#"
            {SELECT_RESERVATION}
            WHERE ($1::BIGINT IS NULL OR r.resv_id = $1)
              AND ($2::VARCHAR IS NULL OR r.member_id = $2)
              AND ($3::BIGINT IS NULL OR r.facility_id = $3)
            ORDER BY r.resv_id ASC
            "#
        );
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(filter.id)
            .bind(filter.member_id.as_ref().map(|m| m.as_str()))
            .bind(filter.facility_id)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATION} WHERE r.resv_id = $1");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<u64> {
        if event.patch.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "no updatable field was given".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        // Ownership guard. "Not found" and "someone else's" share one
        // failure so callers cannot enumerate foreign reservation ids.
        {
            let owned = self
                .exists_in_tx(&mut tx, event.reservation_id, &event.requested_member)
                .await?;
            if !owned {
                return Err(AppError::EntityNotFound(format!(
                    "reservation ({}) was not found for member ({})",
                    event.reservation_id, event.requested_member
                )));
            }
        }

        // COALESCE keeps the stored value wherever the patch is NULL.
        let res = sqlx::query(
            r#"
            UPDATE reservations
            SET resv_content      = COALESCE($3::TEXT, resv_content),
                resv_person_count = COALESCE($4::INT, resv_person_count),
                resv_status       = COALESCE($5::VARCHAR, resv_status)
            WHERE resv_id = $1
              AND member_id = $2
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.requested_member.as_str())
        .bind(event.patch.content.as_deref())
        .bind(event.patch.person_count)
        .bind(event.patch.status.map(|s| s.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(map_update_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(res.rows_affected())
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<u64> {
        let mut tx = self.db.begin().await?;

        // Same merged failure as update: foreign ids look missing.
        {
            let owned = self
                .exists_in_tx(&mut tx, event.reservation_id, &event.requested_member)
                .await?;
            if !owned {
                return Err(AppError::EntityNotFound(format!(
                    "reservation ({}) was not found for member ({})",
                    event.reservation_id, event.requested_member
                )));
            }
        }

        let res = sqlx::query(
            r#"
            DELETE FROM reservations WHERE resv_id = $1 AND member_id = $2
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.requested_member.as_str())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(res.rows_affected())
    }

    async fn find_completed_by_facility_and_date(
        &self,
        facility_id: FacilityId,
        want_date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let sql = format!(
            r#"
            {SELECT_RESERVATION}
            WHERE r.facility_id = $1
              AND r.resv_status = $2
              AND r.want_date = $3
            ORDER BY r.resv_start_time ASC
            "#
        );
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(facility_id)
            .bind(ReservationStatus::Completed.to_string())
            .bind(want_date)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }
}

impl ReservationRepositoryImpl {
    // The create transaction runs its pre-checks and insert under
    // SERIALIZABLE so the check results stay valid until commit.
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // Ownership check reused by update and delete inside their
    // transactions.
    async fn exists_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
        member_id: &MemberId,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations WHERE resv_id = $1 AND member_id = $2
            )
            "#,
        )
        .bind(reservation_id)
        .bind(member_id.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

// A foreign key failure on INSERT means the referenced member or
// facility vanished; report it like the pre-check would have.
fn map_insert_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::RowNotFound = &e {
        return AppError::NoRowsAffectedError("no reservation record has been created".into());
    }
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let target = if db.constraint().is_some_and(|c| c.contains("member")) {
                "member"
            } else {
                "facility"
            };
            return AppError::EntityNotFound(format!(
                "reservation references a {target} that does not exist"
            ));
        }
    }
    AppError::SpecificOperationError(e)
}

// Completing a reservation can collide with the completed-overlap
// exclusion constraint; surface that as a conflict, not a server error.
fn map_update_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return AppError::ReservationConflict(
                "completing this reservation would overlap an existing completed reservation"
                    .into(),
            );
        }
    }
    AppError::SpecificOperationError(e)
}
