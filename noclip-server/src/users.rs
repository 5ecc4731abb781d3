use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};

use crate::{
    auth::CurrentUser,
    context::ServerContext,
    errors::ServerResult,
    schemas::{RegisterSchema, ValidatedJson},
    serialized::{ErrorBody, RegisteredUser, Status, ToSerialized, User},
    Router,
};

#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = RegisterSchema,
    responses(
        (status = 201, body = RegisteredUser),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody, description = "The id is taken")
    )
)]
pub(crate) async fn register(
    State(context): State<ServerContext>,
    ValidatedJson(body): ValidatedJson<RegisterSchema>,
) -> ServerResult<(StatusCode, Json<RegisteredUser>)> {
    let user = context.collab.auth.register(&body.id).await?;

    Ok((StatusCode::CREATED, Json(user.to_serialized())))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(
        ("ApiKey" = [])
    ),
    responses(
        (status = 200, body = User),
        (status = 401, body = ErrorBody)
    )
)]
pub(crate) async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user.to_serialized())
}

#[utoipa::path(
    post,
    path = "/users/add/{friend_id}",
    tag = "users",
    params(
        ("friend_id" = String, Path, description = "The user to add as friend")
    ),
    security(
        ("ApiKey" = [])
    ),
    responses(
        (status = 200, body = Status),
        (status = 400, body = ErrorBody, description = "Tried to add yourself"),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub(crate) async fn add_friend(
    CurrentUser(user): CurrentUser,
    State(context): State<ServerContext>,
    Path(friend_id): Path<String>,
) -> ServerResult<Json<Status>> {
    let status = context.collab.friends.add_friend(&user, &friend_id).await?;

    Ok(Json(status.to_serialized()))
}

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
        .route("/add/:friend_id", post(add_friend))
}
