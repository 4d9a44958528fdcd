use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};

use crate::{error::AppError, models::RawRecommendationRequest};

/// JSON object body, decoded into an unvalidated recommendation request
///
/// A body that is not a JSON object is a processing failure, reported like
/// any other unexpected error rather than as a validation error.
pub struct RecommendationJson(pub RawRecommendationRequest);

#[async_trait]
impl<S> FromRequest<S> for RecommendationJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Map<String, Value>>::from_request(request, state).await {
            Ok(Json(body)) => Ok(Self(body.into())),
            Err(rejection) => Err(AppError::InvalidPayload(rejection.body_text())),
        }
    }
}
