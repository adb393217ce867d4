use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::booking::{self, BookingStatus};
use models::booking_service;
use serde::Deserialize;
use service::authz::{Action, Resource, Target};
use service::repo::bookings::{self, BookingChanges, NewBooking};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: BookingStatus,
}

/// Customers always book for themselves in `requested` state.
#[utoipa::path(
    post, path = "/bookings", tag = "bookings",
    request_body = crate::openapi::BookingCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BookingDoc),
        (status = 403, description = "Booking for someone else"),
        (status = 404, description = "Owner missing")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewBooking>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::Create)?;
    let created = bookings::create(&state.db, &who, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/bookings", tag = "bookings",
    responses(
        (status = 200, description = "All bookings", body = [crate::openapi::BookingDoc]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::List)?;
    Ok(Json(bookings::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/bookings/me", tag = "bookings",
    responses(
        (status = 200, description = "The caller's bookings", body = [crate::openapi::BookingDoc])
    )
)]
pub async fn list_mine(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::ListMine)?;
    Ok(Json(bookings::list_by_owner(&state.db, who.user_id).await?))
}

#[utoipa::path(
    get, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = crate::openapi::BookingDoc),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<booking::Model>, JsonApiError> {
    state.guard.allow_on(&who, Resource::Booking, Action::Read, Target::Booking(id)).await?;
    Ok(Json(bookings::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::BookingUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BookingDoc),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<BookingChanges>,
) -> Result<Json<booking::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::Update)?;
    Ok(Json(bookings::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::Delete)?;
    bookings::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/bookings/{id}/me", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_mine(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.guard.allow_on(&who, Resource::Booking, Action::DeleteMine, Target::Booking(id)).await?;
    bookings::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch, path = "/bookings/{id}/status", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = crate::openapi::BookingStatusDoc,
    responses(
        (status = 200, description = "Status changed", body = crate::openapi::BookingDoc),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_status(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<StatusInput>,
) -> Result<Json<booking::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::Booking, Action::UpdateStatus)?;
    Ok(Json(bookings::update_status(&state.db, id, input.status).await?))
}

#[utoipa::path(
    get, path = "/bookings/{id}/services", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking lines", body = [crate::openapi::BookingServiceDoc]),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_services(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<booking_service::Model>>, JsonApiError> {
    state.guard.allow_on(&who, Resource::Booking, Action::ListServices, Target::Booking(id)).await?;
    Ok(Json(bookings::list_services(&state.db, id).await?))
}
