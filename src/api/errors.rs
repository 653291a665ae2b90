use axum::{http::StatusCode, response::IntoResponse, Json};
use crate::errors::MuxError;
use super::models::{AttemptSummary, ErrorResponse, FailureResponse};

impl IntoResponse for MuxError {
    fn into_response(self) -> axum::response::Response {
        match self {
            MuxError::AllProvidersFailed { attempts } => {
                let body = FailureResponse {
                    error: "all providers failed".to_string(),
                    attempts: attempts.iter().filter_map(AttemptSummary::from_result).collect(),
                };
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            MuxError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: self.to_string() })).into_response()
            }
            _ => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: self.to_string() })).into_response()
            }
        }
    }
}
