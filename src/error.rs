use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::classifier::ClassifierError;

/// Message returned when `user_profile` or `jobs` is missing
pub const MISSING_INPUT_MESSAGE: &str = "Missing user_profile or jobs data";

/// Message returned for any unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing user_profile or jobs data")]
    MissingInput,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingInput => (
                StatusCode::BAD_REQUEST,
                json!({ "error": MISSING_INPUT_MESSAGE }),
            ),
            _ => {
                let details = self.to_string();
                tracing::error!(error = %details, "Request processing failed");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": INTERNAL_ERROR_MESSAGE,
                        "details": details,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_input_is_bad_request() {
        let response = AppError::MissingInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing user_profile or jobs data" })
        );
    }

    #[tokio::test]
    async fn test_classifier_error_is_internal() {
        let error = AppError::from(ClassifierError::MissingFeature("final_score".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "An internal server error occurred.");
        assert_eq!(
            body["details"],
            "Feature 'final_score' the model was trained on is missing from the input"
        );
    }

    #[tokio::test]
    async fn test_invalid_payload_carries_details() {
        let response = AppError::InvalidPayload("expected a JSON object".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["details"], "Invalid payload: expected a JSON object");
    }
}
