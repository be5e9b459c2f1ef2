use crate::core::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Conflict(String),
}

impl ApiError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::App(AppError::SchemaMismatch(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "schema_mismatch")
            }
            ApiError::App(AppError::StoreUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            ApiError::App(AppError::UnknownEntity(_)) => (StatusCode::NOT_FOUND, "unknown_entity"),
            ApiError::App(AppError::UnknownColumn(..)) | ApiError::App(AppError::NotHydrated(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = match self {
            ApiError::App(err) => err.to_string(),
            ApiError::Conflict(msg) => msg,
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_errors_map_to_status_codes() {
        let cases = [
            (AppError::schema_mismatch("3 of 4"), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::StoreUnavailable("disk".into()), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::UnknownEntity("pets".into()), StatusCode::NOT_FOUND),
            (AppError::NotHydrated("members".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn conflict_response_carries_code() {
        let response = ApiError::conflict("meeting day 'Sunday' already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
