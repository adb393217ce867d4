use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::user;
use service::authz::{Action, Resource};
use service::repo::users::{self, NewUser, UserChanges};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::UserCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email taken")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    state.guard.allow(&who, Resource::User, Action::Create)?;
    let created = users::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    responses(
        (status = 200, description = "All users", body = [crate::openapi::UserDoc]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::User, Action::List)?;
    Ok(Json(users::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = crate::openapi::UserDoc),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<user::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::User, Action::Read)?;
    Ok(Json(users::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = crate::openapi::UserUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<UserChanges>,
) -> Result<Json<user::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::User, Action::Update)?;
    Ok(Json(users::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still referenced")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.guard.allow(&who, Resource::User, Action::Delete)?;
    users::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
