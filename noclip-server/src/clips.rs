use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json,
};

use crate::{
    auth::CurrentUser,
    context::ServerContext,
    errors::ServerResult,
    schemas::{ClipSchema, ValidatedJson},
    serialized::{Clip, ErrorBody, Status, ToSerialized},
    Router,
};

#[utoipa::path(
    put,
    path = "/clip/{bucket}",
    tag = "clips",
    request_body = ClipSchema,
    params(
        ("bucket" = String, Path, description = "The bucket to store the clip in")
    ),
    security(
        ("ApiKey" = [])
    ),
    responses(
        (status = 200, body = Status),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody)
    )
)]
pub(crate) async fn put_clip(
    CurrentUser(user): CurrentUser,
    State(context): State<ServerContext>,
    Path(bucket): Path<String>,
    ValidatedJson(body): ValidatedJson<ClipSchema>,
) -> ServerResult<Json<Status>> {
    context
        .collab
        .clips
        .put_clip(&user, &bucket, body.content)
        .await?;

    Ok(Json(Status::success()))
}

#[utoipa::path(
    get,
    path = "/clip/{owner_id}/{bucket}",
    tag = "clips",
    params(
        ("owner_id" = String, Path, description = "The user owning the bucket"),
        ("bucket" = String, Path, description = "The bucket to read")
    ),
    security(
        ("ApiKey" = [])
    ),
    responses(
        (status = 200, body = Clip),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody, description = "The owner is not a friend"),
        (status = 404, body = ErrorBody)
    )
)]
pub(crate) async fn get_clip(
    CurrentUser(user): CurrentUser,
    State(context): State<ServerContext>,
    Path((owner_id, bucket)): Path<(String, String)>,
) -> ServerResult<Json<Clip>> {
    let clip = context
        .collab
        .clips
        .get_clip(&user, &owner_id, &bucket)
        .await?;

    Ok(Json(clip.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/:bucket", put(put_clip))
        .route("/:owner_id/:bucket", get(get_clip))
}
