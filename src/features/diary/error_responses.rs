use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::data::models::DiaryError;
use crate::features::auth::error_responses::error_response;

impl IntoResponse for DiaryError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DiaryError::EmptyContent => (StatusCode::BAD_REQUEST, self.to_string()),
            DiaryError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            DiaryError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            DiaryError::DatabaseError(e) => {
                log::error!("Diary store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                )
            }
        };

        error_response(status, message)
    }
}
