use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct ClipSchema {
    /// The text to store, kept verbatim
    pub content: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterSchema {
    /// The id other users will know you by
    #[validate(length(min = 1, max = 64))]
    pub id: String,
}

/// A JSON body that was parsed and validated, rejecting with a 400 otherwise
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| ServerError::InvalidRequest(e.body_text()))?;

        body.validate()
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;

        Ok(Self(body))
    }
}
