use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ReservationConflict(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    MalformedDateTimeError(String),
    #[error(transparent)]
    ConvertToDateTimeError(#[from] chrono::ParseError),
    #[error(transparent)]
    ConversionEntityError(#[from] strum::ParseError),
    #[error("transaction could not be run")]
    TransactionError(#[source] sqlx::Error),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReservationConflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_)
            | AppError::MalformedDateTimeError(_)
            | AppError::ConvertToDateTimeError(_)
            | AppError::ConversionEntityError(_) => StatusCode::BAD_REQUEST,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_faults_map_to_4xx() {
        let cases = [
            (
                AppError::UnprocessableEntity("empty patch".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::EntityNotFound("missing".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::ReservationConflict("taken".into()),
                StatusCode::CONFLICT,
            ),
            (
                AppError::MalformedDateTimeError("2025-9-20".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn store_faults_map_to_500() {
        let error = AppError::NoRowsAffectedError("update hit nothing".into());
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
