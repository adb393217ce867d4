use chrono::Utc;
use models::{booking, booking_service, company_service};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ensure_deleted;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewBookingService {
    pub booking_id: Uuid,
    pub company_service_id: Uuid,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingServiceChanges {
    #[serde(default, deserialize_with = "super::nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub quantity: Option<i32>,
}

#[instrument(skip(db, input), fields(booking_id = %input.booking_id))]
pub async fn create(db: &DatabaseConnection, input: NewBookingService) -> Result<booking_service::Model, ServiceError> {
    booking::Entity::find_by_id(input.booking_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("booking"))?;
    company_service::Entity::find_by_id(input.company_service_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("company_service"))?;
    let created = booking_service::create(
        db,
        input.booking_id,
        input.company_service_id,
        input.notes,
        input.quantity.unwrap_or(1),
    )
    .await?;
    info!(booking_service_id = %created.id, "booking_service_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<booking_service::Model>, ServiceError> {
    Ok(booking_service::Entity::find()
        .order_by_asc(booking_service::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<booking_service::Model, ServiceError> {
    booking_service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("booking_service"))
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    changes: BookingServiceChanges,
) -> Result<booking_service::Model, ServiceError> {
    let mut am: booking_service::ActiveModel = get(db, id).await?.into();
    if let Some(notes) = changes.notes {
        am.notes = Set(notes);
    }
    if let Some(quantity) = changes.quantity {
        booking_service::validate_quantity(quantity)?;
        am.quantity = Set(quantity);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = booking_service::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "booking_service")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_user};
    use models::booking::BookingStatus;
    use models::user::Role;
    use models::{company, service};

    #[tokio::test]
    async fn lines_default_quantity_and_validate() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = make_user(&db, "u@example.com", Role::Customer).await?;
        let co = company::create(&db, u.id, "Lima", None, None).await?;
        let s = service::create(&db, "Flowback", None, 1.0).await?;
        let cs = company_service::create(&db, co.id, s.id, None).await?;
        let b = booking::create(&db, Some(u.id), None, BookingStatus::Requested).await?;

        let line = create(
            &db,
            NewBookingService { booking_id: b.id, company_service_id: cs.id, notes: None, quantity: None },
        )
        .await?;
        assert_eq!(line.quantity, 1);

        let missing = create(
            &db,
            NewBookingService { booking_id: b.id, company_service_id: Uuid::new_v4(), notes: None, quantity: None },
        )
        .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let bad = update(&db, line.id, BookingServiceChanges { quantity: Some(0), notes: None }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        let ok = update(&db, line.id, BookingServiceChanges { quantity: Some(4), notes: Some(Some("night shift".into())) }).await?;
        assert_eq!(ok.quantity, 4);
        assert_eq!(ok.notes.as_deref(), Some("night shift"));
        let cleared = update(&db, line.id, BookingServiceChanges { notes: Some(None), quantity: None }).await?;
        assert_eq!(cleared.notes, None);
        assert_eq!(cleared.quantity, 4);

        // the offering is pinned by the line
        let blocked = company_service::Entity::delete_by_id(cs.id).exec(&db).await;
        assert!(blocked.is_err());
        delete(&db, line.id).await?;
        assert!(list(&db).await?.is_empty());
        Ok(())
    }
}
