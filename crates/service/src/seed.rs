//! Demo data for a fresh database.
use models::booking::{self, BookingStatus};
use models::user::{self, Role};
use models::{booking_service, company, company_service, service};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use tracing::info;

use crate::auth::password::hash_password;
use crate::errors::ServiceError;

pub const ADMIN_EMAIL: &str = "admin@oilgas.local";
pub const DEMO_PASSWORD: &str = "changeme123";

const SERVICES: &[(&str, f64)] = &[
    ("Well drilling", 250_000.0),
    ("Geological exploration", 120_000.0),
    ("Well workover", 80_000.0),
    ("Geophysical survey", 60_000.0),
    ("Pipeline repair", 45_000.0),
    ("Equipment diagnostics", 8_000.0),
    ("Environmental monitoring", 12_000.0),
    ("Tank cleaning", 15_000.0),
];

/// (company name, owner index, offered service indexes)
const COMPANIES: &[(&str, usize, &[usize])] = &[
    ("Northern Drilling Co", 1, &[0, 2, 5]),
    ("Caspian Geo Services", 1, &[1, 3]),
    ("Steppe Pipeline Works", 2, &[4, 5, 7]),
    ("Tundra Environmental", 2, &[6, 7]),
];

/// Populate demo rows when the user table is empty. Returns whether anything was written.
pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<bool, ServiceError> {
    if user::Entity::find().count(db).await? > 0 {
        info!(event = "seed_skipped", reason = "users present");
        return Ok(false);
    }
    let hash = hash_password(DEMO_PASSWORD).map_err(|e| ServiceError::Db(e.to_string()))?;

    let txn = db.begin().await?;
    let users = vec![
        user::create(&txn, "Administrator", ADMIN_EMAIL, &hash, Role::Admin).await?,
        user::create(&txn, "Aigerim Sadykova", "aigerim@oilgas.local", &hash, Role::Customer).await?,
        user::create(&txn, "Ivan Petrov", "ivan@oilgas.local", &hash, Role::Customer).await?,
    ];
    let mut services = Vec::with_capacity(SERVICES.len());
    for (title, price) in SERVICES {
        services.push(service::create(&txn, title, None, *price).await?);
    }
    let mut offerings = Vec::new();
    for (name, owner, offered) in COMPANIES {
        let c = company::create(&txn, users[*owner].id, name, None, None).await?;
        for idx in offered.iter() {
            offerings.push(company_service::create(&txn, c.id, services[*idx].id, None).await?);
        }
    }
    let b = booking::create(
        &txn,
        Some(users[2].id),
        Some("Quarterly maintenance at pad 12".into()),
        BookingStatus::Requested,
    )
    .await?;
    booking_service::create(&txn, b.id, offerings[0].id, Some("Crew of four".into()), 1).await?;
    txn.commit().await?;

    info!(
        event = "seed_completed",
        users = users.len(),
        services = services.len(),
        companies = COMPANIES.len(),
        offerings = offerings.len(),
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seeds_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(seed_if_empty(&db).await?);
        assert!(!seed_if_empty(&db).await?);
        assert_eq!(user::Entity::find().count(&db).await?, 3);
        assert_eq!(company::Entity::find().count(&db).await?, COMPANIES.len() as u64);
        assert_eq!(booking_service::Entity::find().count(&db).await?, 1);
        Ok(())
    }
}
