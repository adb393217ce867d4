pub mod auth;
pub mod booking_services;
pub mod bookings;
pub mod business;
pub mod companies;
pub mod company_services;
pub mod services;
pub mod users;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use self::auth::ServerState;

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "OK", body = crate::openapi::HealthResponse)
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public routes plus everything behind the identity middleware.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/api-docs/openapi.json", get(openapi_json));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users", post(users::create).get(users::list))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/companies", post(companies::create).get(companies::list))
        .route("/companies/my", get(companies::list_mine))
        .route("/companies/:id", get(companies::get).put(companies::update).delete(companies::delete))
        .route("/companies/:id/services", get(companies::list_services))
        .route("/services", post(services::create).get(services::list))
        .route("/services/my", get(services::list_mine))
        .route("/services/:id", get(services::get).put(services::update).delete(services::delete))
        .route("/services/:id/companies", get(services::list_companies))
        .route("/company-services", post(company_services::create).get(company_services::list))
        .route("/company-services/my", get(company_services::list_mine))
        .route(
            "/company-services/:id",
            get(company_services::get).put(company_services::update).delete(company_services::delete),
        )
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/bookings/me", get(bookings::list_mine))
        .route("/bookings/:id", get(bookings::get).put(bookings::update).delete(bookings::delete))
        .route("/bookings/:id/me", delete(bookings::delete_mine))
        .route("/bookings/:id/status", patch(bookings::update_status))
        .route("/bookings/:id/services", get(bookings::list_services))
        .route("/booking-services", post(booking_services::create).get(booking_services::list))
        .route(
            "/booking-services/:id",
            get(booking_services::get).put(booking_services::update).delete(booking_services::delete),
        )
        .route("/business/companies-by-service/:service", get(business::companies_by_service))
        .route("/business/users-with-active-bookings", get(business::users_with_active_bookings))
        .route("/business/company-stats", get(business::company_stats))
        .route("/business/popular-services", get(business::popular_services))
        .route("/business/search", get(business::search))
        .route("/business/system-overview", get(business::system_overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_identity));

    public
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request, without headers
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
