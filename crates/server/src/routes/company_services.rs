use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use models::company_service;
use service::authz::{Action, Resource, Target};
use service::repo::company_services::{self, CompanyServiceChanges, NewCompanyService};
use uuid::Uuid;

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};

/// Ownership is checked on the company named in the body.
#[utoipa::path(
    post, path = "/company-services", tag = "company-services",
    request_body = crate::openapi::CompanyServiceCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CompanyServiceDoc),
        (status = 403, description = "Not the company owner"),
        (status = 404, description = "Company or service missing"),
        (status = 409, description = "Already offered")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiJson(input): ApiJson<NewCompanyService>,
) -> Result<(StatusCode, Json<company_service::Model>), JsonApiError> {
    state
        .guard
        .allow_on(&who, Resource::CompanyService, Action::Create, Target::Company(input.company_id))
        .await?;
    let created = company_services::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/company-services", tag = "company-services",
    responses(
        (status = 200, description = "All offerings", body = [crate::openapi::CompanyServiceDoc]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<company_service::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::CompanyService, Action::List)?;
    Ok(Json(company_services::list(&state.db).await?))
}

#[utoipa::path(
    get, path = "/company-services/my", tag = "company-services",
    responses(
        (status = 200, description = "Offerings of the caller's companies", body = [crate::openapi::CompanyServiceDoc])
    )
)]
pub async fn list_mine(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<company_service::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::CompanyService, Action::ListMine)?;
    Ok(Json(company_services::list_by_owner(&state.db, who.user_id).await?))
}

#[utoipa::path(
    get, path = "/company-services/{id}", tag = "company-services",
    params(("id" = Uuid, Path, description = "Offering id")),
    responses(
        (status = 200, description = "Offering", body = crate::openapi::CompanyServiceDoc),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<company_service::Model>, JsonApiError> {
    state.guard.allow(&who, Resource::CompanyService, Action::Read)?;
    Ok(Json(company_services::get(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/company-services/{id}", tag = "company-services",
    params(("id" = Uuid, Path, description = "Offering id")),
    request_body = crate::openapi::CompanyServiceUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CompanyServiceDoc),
        (status = 403, description = "Not the company owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<CompanyServiceChanges>,
) -> Result<Json<company_service::Model>, JsonApiError> {
    state
        .guard
        .allow_on(&who, Resource::CompanyService, Action::Update, Target::CompanyService(id))
        .await?;
    Ok(Json(company_services::update(&state.db, id, changes).await?))
}

#[utoipa::path(
    delete, path = "/company-services/{id}", tag = "company-services",
    params(("id" = Uuid, Path, description = "Offering id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the company owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still booked")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state
        .guard
        .allow_on(&who, Resource::CompanyService, Action::Delete, Target::CompanyService(id))
        .await?;
    company_services::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
