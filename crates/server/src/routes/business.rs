//! Reporting endpoints. Everything except the company lookup by service is admin only.
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};
use models::company;
use serde::{Deserialize, Serialize};
use service::analytics::{
    self, CompanyStats, Period, PopularService, SearchResult, SystemOverview, UserWithActiveBookings,
    DEFAULT_POPULAR_LIMIT,
};
use service::authz::{Action, Resource};

use super::auth::ServerState;
use crate::errors::JsonApiError;
use crate::extract::{ApiPath, ApiQuery, CurrentUser};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CompanyStatsReport {
    pub period: Period,
    pub companies: Vec<CompanyStats>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Turns inclusive calendar dates into a `[from, to)` UTC window.
/// Defaults to the month ending today.
pub fn stats_window(q: &StatsQuery, today: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), JsonApiError> {
    let to = q.to.unwrap_or(today);
    let from = match q.from {
        Some(d) => d,
        None => to.checked_sub_months(Months::new(1)).unwrap_or(to),
    };
    if from > to {
        return Err(JsonApiError::bad_request("`from` must not be after `to`"));
    }
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| JsonApiError::bad_request("`to` out of range"))?;
    Ok((start_of(from), start_of(end)))
}

#[utoipa::path(
    get, path = "/business/companies-by-service/{service}", tag = "business",
    params(("service" = String, Path, description = "Exact service title")),
    responses(
        (status = 200, description = "Companies offering the service", body = [crate::openapi::CompanyDoc]),
        (status = 404, description = "No company offers it")
    )
)]
pub async fn companies_by_service(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiPath(title): ApiPath<String>,
) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::SearchByService)?;
    Ok(Json(analytics::companies_by_service(&state.db, &title).await?))
}

#[utoipa::path(
    get, path = "/business/users-with-active-bookings", tag = "business",
    responses(
        (status = 200, description = "Users with requested or active bookings"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn users_with_active_bookings(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<UserWithActiveBookings>>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::Report)?;
    Ok(Json(analytics::users_with_active_bookings(&state.db).await?))
}

#[utoipa::path(
    get, path = "/business/company-stats", tag = "business",
    params(
        ("from" = Option<String>, Query, description = "First day, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Last day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Per-company booking counts"),
        (status = 400, description = "Bad dates"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn company_stats(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiQuery(q): ApiQuery<StatsQuery>,
) -> Result<Json<CompanyStatsReport>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::Report)?;
    let (from, to) = stats_window(&q, Utc::now().date_naive())?;
    let companies = analytics::company_stats(&state.db, from, to).await?;
    Ok(Json(CompanyStatsReport { period: Period { from, to }, companies }))
}

#[utoipa::path(
    get, path = "/business/popular-services", tag = "business",
    params(("limit" = Option<u64>, Query, description = "Defaults to 10")),
    responses(
        (status = 200, description = "Services ranked by bookings"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn popular_services(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiQuery(q): ApiQuery<PopularQuery>,
) -> Result<Json<Vec<PopularService>>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::Report)?;
    let limit = q.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    Ok(Json(analytics::popular_services(&state.db, limit).await?))
}

#[utoipa::path(
    get, path = "/business/search", tag = "business",
    params(("q" = String, Query, description = "Case-insensitive fragment")),
    responses(
        (status = 200, description = "Matching companies and services"),
        (status = 400, description = "Empty query"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::Report)?;
    let needle = q.q.unwrap_or_default();
    Ok(Json(analytics::search(&state.db, &needle).await?))
}

#[utoipa::path(
    get, path = "/business/system-overview", tag = "business",
    responses(
        (status = 200, description = "Combined report"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn system_overview(
    State(state): State<ServerState>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<SystemOverview>, JsonApiError> {
    state.guard.allow(&who, Resource::Analytics, Action::Report)?;
    Ok(Json(analytics::system_overview(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn window_includes_the_whole_last_day() {
        let q = StatsQuery { from: Some(day("2024-03-01")), to: Some(day("2024-03-31")) };
        let (from, to) = stats_window(&q, day("2024-06-01")).unwrap();
        assert_eq!(from.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-04-01T00:00:00+00:00");
    }

    #[test]
    fn window_defaults_to_last_month() {
        let (from, to) = stats_window(&StatsQuery::default(), day("2024-03-15")).unwrap();
        assert_eq!(from, start_of(day("2024-02-15")));
        assert_eq!(to, start_of(day("2024-03-16")));
    }

    #[test]
    fn single_day_window_is_valid() {
        let d = day("2024-01-10");
        let (from, to) = stats_window(&StatsQuery { from: Some(d), to: Some(d) }, d).unwrap();
        assert!(from < to);
    }

    #[test]
    fn reversed_window_is_rejected() {
        let q = StatsQuery { from: Some(day("2024-02-01")), to: Some(day("2024-01-01")) };
        let err = stats_window(&q, day("2024-06-01")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
