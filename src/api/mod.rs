use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

use crate::loader::CardSource;
use crate::request::HttpError;

pub mod v1;

pub struct Context {
    pub source: Arc<dyn CardSource>,
}

pub enum AppError {
    Upstream(HttpError),
    BadRequest(String),
}

impl From<HttpError> for AppError {
    fn from(inner: HttpError) -> Self {
        AppError::Upstream(inner)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Upstream(err) => {
                error!("Could not load a card: {:?}", err);
                // the coffee api is the one failing, not us
                let status = if err.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (status, err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
