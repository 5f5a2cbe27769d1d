use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Response;
use serde::de::DeserializeOwned;

use crate::features::auth::error_responses::error_response;

/// `Json<T>` whose rejections (bad syntax, missing fields, wrong content type)
/// answer 400 with the usual `{"error", "status"}` body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                log::warn!("Rejected request body: {}", rejection.body_text());
                Err(error_response(
                    StatusCode::BAD_REQUEST,
                    rejection.body_text(),
                ))
            }
        }
    }
}
