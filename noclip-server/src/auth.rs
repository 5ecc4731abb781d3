use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use log::warn;
use noclip_collab::{AuthError, UserData};

use crate::{errors::ServerError, ServerContext};

/// The header carrying the api key of the requesting user
pub const API_KEY_HEADER: &str = "x-api-key";

/// The user owning the api key presented with the request.
///
/// Handlers taking this as their first argument reject unauthenticated
/// requests before any other extractor or business logic runs.
pub struct CurrentUser(pub UserData);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    ServerContext: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = ServerContext::from_ref(state);

        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|x| x.to_str().ok())
            .ok_or(ServerError::Unauthorized("Missing API key"))?;

        let user = context
            .collab
            .auth
            .authenticate(api_key)
            .await
            .map_err(|e| {
                if let AuthError::InvalidApiKey = e {
                    warn!("Rejected request to {} with an unknown API key", parts.uri.path());
                }

                ServerError::from(e)
            })?;

        Ok(Self(user))
    }
}
