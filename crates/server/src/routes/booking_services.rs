use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::booking_service;
use service::authz::{Action, Resource, Target};
use service::repo::booking_services::{self, BookingServiceChanges, NewBookingService};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

/// Ownership is checked on the booking named in the body.
#[utoipa::path(
    post, path = "/booking-services", tag = "booking-services",
    request_body = crate::openapi::BookingServiceCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BookingServiceDoc),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Booking or offering missing")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewBookingService>,
) -> Result<(StatusCode, Json<booking_service::Model>), JsonApiError> {
    state
        .guard
        .allow_on(&who, Resource::BookingService, Action::Create, Target::Booking(input.booking_id))
        .await?;
    let created = booking_services::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/booking-services", tag = "booking-services",
    responses(
        (status = 200, description = "All booking lines", body = [crate::openapi::BookingServiceDoc]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<booking_service::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::BookingService, Action::List)?;
    Ok(Json(booking_services::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/booking-services/{id}", tag = "booking-services",
    params(("id" = Uuid, Path, description = "Booking line id")),
    responses(
        (status = 200, description = "Booking line", body = crate::openapi::BookingServiceDoc),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<booking_service::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::BookingService, Action::Read)?;
    Ok(Json(booking_services::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/booking-services/{id}", tag = "booking-services",
    params(("id" = Uuid, Path, description = "Booking line id")),
    request_body = crate::openapi::BookingServiceUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BookingServiceDoc),
        (status = 400, description = "Bad quantity"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<BookingServiceChanges>,
) -> Result<Json<booking_service::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::BookingService, Action::Update)?;
    Ok(Json(booking_services::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/booking-services/{id}", tag = "booking-services",
    params(("id" = Uuid, Path, description = "Booking line id")),
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
    state.guard.allow(&who, Resource::BookingService, Action::Delete)?;
    booking_services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
