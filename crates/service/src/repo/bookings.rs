use chrono::Utc;
use models::booking::{self, BookingStatus};
use models::{booking_service, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ensure_deleted;
use crate::auth::Identity;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBooking {
    #[serde(default)]
    pub description: Option<String>,
    /// Admins may book on behalf of another user.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Admins may choose the initial status; customers always start at `requested`.
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChanges {
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[instrument(skip(db, input), fields(caller = %who.user_id))]
pub async fn create(db: &DatabaseConnection, who: &Identity, input: NewBooking) -> Result<booking::Model, ServiceError> {
    let (owner, status) = if who.is_admin() {
        (input.user_id.unwrap_or(who.user_id), input.status.unwrap_or(BookingStatus::Requested))
    } else {
        if input.user_id.is_some_and(|u| u != who.user_id) {
            return Err(ServiceError::Forbidden("cannot book on behalf of another user".into()));
        }
        (who.user_id, BookingStatus::Requested)
    };
    user::Entity::find_by_id(owner)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let created = booking::create(db, Some(owner), input.description, status).await?;
    info!(booking_id = %created.id, owner = %owner, status = status.as_str(), "booking_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<booking::Model>, ServiceError> {
    Ok(booking::Entity::find().order_by_desc(booking::Column::CreatedAt).all(db).await?)
}

pub async fn list_by_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<booking::Model>, ServiceError> {
    Ok(booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("booking"))
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: BookingChanges) -> Result<booking::Model, ServiceError> {
    let mut am: booking::ActiveModel = get(db, id).await?.into();
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    if let Some(status) = changes.status {
        am.status = Set(status);
    }
    if let Some(user_id) = changes.user_id {
        am.user_id = Set(Some(user_id));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn update_status(db: &DatabaseConnection, id: Uuid, status: BookingStatus) -> Result<booking::Model, ServiceError> {
    let updated = update(db, id, BookingChanges { status: Some(status), ..Default::default() }).await?;
    info!(booking_id = %id, status = status.as_str(), "booking_status_changed");
    Ok(updated)
}

/// Booking lines go with the booking.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = booking::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "booking")?;
    info!(booking_id = %id, "booking_deleted");
    Ok(())
}

pub async fn list_services(db: &DatabaseConnection, booking_id: Uuid) -> Result<Vec<booking_service::Model>, ServiceError> {
    get(db, booking_id).await?;
    Ok(booking_service::Entity::find()
        .filter(booking_service::Column::BookingId.eq(booking_id))
        .order_by_asc(booking_service::Column::CreatedAt)
        .all(db)
        .await?)
}
