use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

use crate::error::{JsonError, ServerError, TextError};

/// JSON request body whose rejection renders as plain text.
pub struct TextBody(pub Value);

/// JSON request body whose rejection renders as `{"error": message}`.
pub struct JsonBody(pub Value);

async fn read_json<S: Send + Sync>(req: Request, state: &S) -> Result<Value, ServerError> {
    let Json(value) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|rejection| ServerError::Body(rejection.body_text()))?;
    Ok(value)
}

#[axum::async_trait]
impl<S> FromRequest<S> for TextBody
where
    S: Send + Sync,
{
    type Rejection = TextError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_json(req, state).await?))
    }
}

#[axum::async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_json(req, state).await?))
    }
}
