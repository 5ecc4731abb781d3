use axum::{response::IntoResponse, Json};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{clips, schemas, serialized, users};

#[derive(OpenApi)]
#[openapi(
    paths(
        clips::put_clip,
        clips::get_clip,
        users::register,
        users::me,
        users::add_friend,
    ),
    components(schemas(
        schemas::ClipSchema,
        schemas::RegisterSchema,
        serialized::User,
        serialized::RegisteredUser,
        serialized::Clip,
        serialized::Status,
        serialized::ErrorBody,
    )),
    modifiers(&Security),
    info(
        description = "noclip-server stores clips in buckets and shares them between friends"
    )
)]
pub struct ApiDoc;

struct Security;

impl Modify for Security {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = ApiKey::Header(ApiKeyValue::new("X-API-Key"));

            components.add_security_scheme("ApiKey", SecurityScheme::ApiKey(scheme))
        }
    }
}

pub async fn docs() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
