use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::{company, service as service_entity};
use service::authz::{Action, Resource, Target};
use service::repo::services::{self, NewService, ServiceChanges};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

/// With `company_id`, the caller must own that company; the service is offered
/// from it at once and the caller becomes an owner of the service.
#[utoipa::path(
    post, path = "/services", tag = "services",
    request_body = crate::openapi::ServiceCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Not the company owner")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewService>,
) -> Result<(StatusCode, Json<service_entity::Model>), JsonApiError> {
    state.guard.allow(&who, Resource::Service, Action::Create)?;
    if let Some(company_id) = input.company_id {
        state
            .guard
            .allow_on(&who, Resource::CompanyService, Action::Create, Target::Company(company_id))
            .await?;
    }
    let created = services::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/services", tag = "services",
    responses(
        (status = 200, description = "All services", body = [crate::openapi::ServiceDoc])
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<service_entity::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Service, Action::List)?;
    Ok(Json(services::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/services/my", tag = "services",
    responses(
        (status = 200, description = "Services offered by the caller's companies", body = [crate::openapi::ServiceDoc])
    )
)]
pub async fn list_mine(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<service_entity::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Service, Action::ListMine)?;
    Ok(Json(services::list_by_owner(&state.db, who.user_id).await?))
}

#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service", body = crate::openapi::ServiceDoc),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<service_entity::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::Service, Action::Read)?;
    Ok(Json(services::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = crate::openapi::ServiceUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ServiceDoc),
        (status = 403, description = "Not an owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<ServiceChanges>,
) -> Result<Json<service_entity::Model>, JsonApiError> {
    state.guard.allow_on(&who, Resource::Service, Action::Update, Target::Service(id)).await?;
    Ok(Json(services::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not an owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Offerings still booked")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.guard.allow_on(&who, Resource::Service, Action::Delete, Target::Service(id)).await?;
    services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/services/{id}/companies", tag = "services",
    params(("id" = Uuid, Path, description = "Service id")),
    responses(
        (status = 200, description = "Companies offering the service", body = [crate::openapi::CompanyDoc]),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_companies(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Service, Action::ListCompanies)?;
    Ok(Json(services::list_companies(&state.db, id).await?))
}
