//! Reporting queries behind the `/business` endpoints.
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use models::booking::{self, BookingStatus};
use models::user::{self, Role};
use models::{booking_service, company, company_service, service};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const DEFAULT_POPULAR_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct UserWithActiveBookings {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active_bookings: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyStats {
    pub company_id: Uuid,
    pub company_name: String,
    pub service_count: usize,
    pub booking_count: usize,
    pub last_booking: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularService {
    pub service_id: Uuid,
    pub title: String,
    pub company_count: usize,
    pub booking_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Company,
    Service,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemOverview {
    pub popular_services: Vec<PopularService>,
    pub active_users: Vec<UserWithActiveBookings>,
    pub company_stats: Vec<CompanyStats>,
    pub period: Period,
}

/// Companies offering a service whose title matches exactly.
pub async fn companies_by_service(db: &DatabaseConnection, title: &str) -> Result<Vec<company::Model>, ServiceError> {
    let companies = company::Entity::find()
        .join(JoinType::InnerJoin, company_service::Relation::Company.def().rev())
        .join(JoinType::InnerJoin, company_service::Relation::Service.def())
        .filter(service::Column::Title.eq(title))
        .distinct()
        .order_by_asc(company::Column::Name)
        .all(db)
        .await?;
    if companies.is_empty() {
        return Err(ServiceError::NotFound("no companies found for this service".into()));
    }
    Ok(companies)
}

/// Users holding at least one requested or active booking, with the count.
pub async fn users_with_active_bookings(db: &DatabaseConnection) -> Result<Vec<UserWithActiveBookings>, ServiceError> {
    let open = [BookingStatus::Requested.as_str(), BookingStatus::Active.as_str()];
    Ok(user::Entity::find()
        .select_only()
        .column_as(user::Column::Id, "user_id")
        .column(user::Column::Name)
        .column(user::Column::Email)
        .column(user::Column::Role)
        .column_as(Expr::col((booking::Entity, booking::Column::Id)).count(), "active_bookings")
        .join(JoinType::InnerJoin, booking::Relation::User.def().rev())
        .filter(booking::Column::Status.is_in(open))
        .group_by(user::Column::Id)
        .order_by_asc(user::Column::Name)
        .into_model::<UserWithActiveBookings>()
        .all(db)
        .await?)
}

/// Per-company offering and booking counts for bookings created in `[from, to)`.
/// Companies without bookings in the window are left out.
#[instrument(skip(db))]
pub async fn company_stats(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<CompanyStats>, ServiceError> {
    if from >= to {
        return Err(ServiceError::Validation("`from` must be before `to`".into()));
    }
    let companies = company::Entity::find().all(db).await?;
    let offerings: Vec<Uuid> = company_service::Entity::find()
        .select_only()
        .column(company_service::Column::CompanyId)
        .into_tuple()
        .all(db)
        .await?;
    let lines: Vec<(Uuid, DateTimeWithTimeZone)> = booking_service::Entity::find()
        .select_only()
        .column(company_service::Column::CompanyId)
        .column(booking::Column::CreatedAt)
        .join(JoinType::InnerJoin, booking_service::Relation::CompanyService.def())
        .join(JoinType::InnerJoin, booking_service::Relation::Booking.def())
        .into_tuple()
        .all(db)
        .await?;

    let mut service_counts: HashMap<Uuid, usize> = HashMap::new();
    for company_id in offerings {
        *service_counts.entry(company_id).or_default() += 1;
    }
    let mut bookings: HashMap<Uuid, (usize, DateTime<Utc>)> = HashMap::new();
    for (company_id, created) in lines {
        let created = created.with_timezone(&Utc);
        if created < from || created >= to {
            continue;
        }
        let e = bookings.entry(company_id).or_insert((0, created));
        e.0 += 1;
        e.1 = e.1.max(created);
    }

    let mut stats: Vec<CompanyStats> = companies
        .into_iter()
        .filter_map(|c| {
            let (booking_count, last) = bookings.get(&c.id).copied()?;
            Some(CompanyStats {
                company_id: c.id,
                service_count: service_counts.get(&c.id).copied().unwrap_or(0),
                company_name: c.name,
                booking_count,
                last_booking: Some(last),
            })
        })
        .collect();
    stats.sort_by(|a, b| b.booking_count.cmp(&a.booking_count).then_with(|| a.company_name.cmp(&b.company_name)));
    Ok(stats)
}

/// Services ranked by how many booking lines reference them.
pub async fn popular_services(db: &DatabaseConnection, limit: u64) -> Result<Vec<PopularService>, ServiceError> {
    let limit = if limit == 0 { DEFAULT_POPULAR_LIMIT } else { limit };
    let services = service::Entity::find().all(db).await?;
    let offerings: Vec<Uuid> = company_service::Entity::find()
        .select_only()
        .column(company_service::Column::ServiceId)
        .into_tuple()
        .all(db)
        .await?;
    let booked: Vec<Uuid> = booking_service::Entity::find()
        .select_only()
        .column(company_service::Column::ServiceId)
        .join(JoinType::InnerJoin, booking_service::Relation::CompanyService.def())
        .into_tuple()
        .all(db)
        .await?;

    let count = |ids: Vec<Uuid>| {
        let mut m: HashMap<Uuid, usize> = HashMap::new();
        for id in ids {
            *m.entry(id).or_default() += 1;
        }
        m
    };
    let company_counts = count(offerings);
    let booking_counts = count(booked);

    let mut ranked: Vec<PopularService> = services
        .into_iter()
        .map(|s| PopularService {
            service_id: s.id,
            company_count: company_counts.get(&s.id).copied().unwrap_or(0),
            booking_count: booking_counts.get(&s.id).copied().unwrap_or(0),
            title: s.title,
        })
        .collect();
    ranked.sort_by(|a, b| b.booking_count.cmp(&a.booking_count).then_with(|| a.title.cmp(&b.title)));
    ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    Ok(ranked)
}

/// Case-insensitive substring search over company names and service titles.
pub async fn search(db: &DatabaseConnection, q: &str) -> Result<Vec<SearchResult>, ServiceError> {
    let needle = q.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ServiceError::Validation("query parameter `q` is required".into()));
    }
    let mut results: Vec<SearchResult> = company::Entity::find()
        .order_by_asc(company::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .map(|c| SearchResult { kind: SearchKind::Company, id: c.id, name: c.name, description: c.description })
        .collect();
    results.extend(
        service::Entity::find()
            .order_by_asc(service::Column::Title)
            .all(db)
            .await?
            .into_iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .map(|s| SearchResult { kind: SearchKind::Service, id: s.id, name: s.title, description: s.description }),
    );
    Ok(results)
}

/// Combined report: top five services, active customers and last month's company stats.
pub async fn system_overview(db: &DatabaseConnection) -> Result<SystemOverview, ServiceError> {
    let to = Utc::now();
    let from = to - Duration::days(30);
    Ok(SystemOverview {
        popular_services: popular_services(db, 5).await?,
        active_users: users_with_active_bookings(db).await?,
        company_stats: company_stats(db, from, to + Duration::seconds(1)).await?,
        period: Period { from, to },
    })
}
