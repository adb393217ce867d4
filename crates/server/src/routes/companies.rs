use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::{company, service as service_entity};
use service::authz::{Action, Resource, Target};
use service::repo::companies::{self, CompanyChanges, NewCompany};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

/// The caller becomes the owner.
#[utoipa::path(
    post, path = "/companies", tag = "companies",
    request_body = crate::openapi::CompanyCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CompanyDoc),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewCompany>,
) -> Result<(StatusCode, Json<company::Model>), JsonApiError> {
    state.guard.allow(&who, Resource::Company, Action::Create)?;
    let created = companies::create(&state.db, who.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/companies", tag = "companies",
    responses(
        (status = 200, description = "All companies", body = [crate::openapi::CompanyDoc])
    )
)]
pub async fn list(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Company, Action::List)?;
    Ok(Json(companies::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/companies/my", tag = "companies",
    responses(
        (status = 200, description = "Companies owned by the caller", body = [crate::openapi::CompanyDoc])
    )
)]
pub async fn list_mine(State(state): State<ServerState>, CurrentUser(who): CurrentUser) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Company, Action::ListMine)?;
    Ok(Json(companies::list_by_owner(&state.db, who.user_id).await?))
}

#[utoipa::path(
    get, path = "/companies/{id}", tag = "companies",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = crate::openapi::CompanyDoc),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<company::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::Company, Action::Read)?;
    Ok(Json(companies::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/companies/{id}", tag = "companies",
    params(("id" = Uuid, Path, description = "Company id")),
    request_body = crate::openapi::CompanyUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CompanyDoc),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<CompanyChanges>,
) -> Result<Json<company::Model>, JsonApiError> {
    state.guard.allow_on(&who, Resource::Company, Action::Update, Target::Company(id)).await?;
    Ok(Json(companies::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/companies/{id}", tag = "companies",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Offerings still booked")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.guard.allow_on(&who, Resource::Company, Action::Delete, Target::Company(id)).await?;
    companies::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/companies/{id}/services", tag = "companies",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Services offered", body = [crate::openapi::ServiceDoc]),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_services(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Vec<service_entity::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Company, Action::ListServices)?;
    Ok(Json(companies::list_services(&state.db, id).await?))
}
