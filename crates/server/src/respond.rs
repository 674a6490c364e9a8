//! Maps [`ActionOutcome`] values onto HTTP responses.

use actions::ActionOutcome;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use portal::{Denial, FieldError, PagePath};
use serde::Serialize;

/// Success envelope: the action payload plus the pages the mutation made stale.
#[derive(Debug, Serialize)]
pub struct OkBody<T> {
    pub data: T,
    pub invalidated: Vec<PagePath>,
}

/// Error envelope for denials and backend failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Validation envelope: one entry per failing field.
#[derive(Debug, Serialize)]
pub struct InvalidBody {
    pub errors: Vec<FieldError>,
}

/// `Ok` → 200, `Denied(Unauthenticated)` → 401, `Denied(Forbidden)` → 403,
/// `Invalid` → 422, `Failed` → 500.
pub fn respond<T: Serialize>(outcome: ActionOutcome<T>) -> Response {
    match outcome {
        ActionOutcome::Ok { value, invalidated } => Json(OkBody {
            data: value,
            invalidated,
        })
        .into_response(),
        ActionOutcome::Denied(denial) => {
            let status = match denial {
                Denial::Unauthenticated => StatusCode::UNAUTHORIZED,
                Denial::Forbidden { .. } => StatusCode::FORBIDDEN,
            };
            (
                status,
                Json(ErrorBody {
                    error: denial.to_string(),
                }),
            )
                .into_response()
        }
        ActionOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(InvalidBody { errors }),
        )
            .into_response(),
        ActionOutcome::Failed { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: message }),
        )
            .into_response(),
    }
}

/// 422 for path parameters that cannot form a domain identifier (an empty
/// segment after percent-decoding, in practice).
pub fn invalid_path_id(what: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(InvalidBody {
            errors: vec![FieldError::new(what, "Must not be empty")],
        }),
    )
        .into_response()
}
