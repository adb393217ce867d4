use chrono::Utc;
use models::user::{self, Role};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ensure_deleted;
use crate::auth::password::hash_password;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

fn check_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 8 {
        return Err(ServiceError::Validation("password too short (>=8)".into()));
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, ServiceError> {
    hash_password(password).map_err(|e| ServiceError::Db(e.to_string()))
}

#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, ServiceError> {
    check_password(&input.password)?;
    let hashed = hash(&input.password)?;
    let created = user::create(db, &input.name, &input.email, &hashed, input.role.unwrap_or(Role::Customer)).await?;
    info!(user_id = %created.id, role = created.role.as_str(), "user_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<user::Model>, ServiceError> {
    Ok(user::Entity::find().order_by_asc(user::Column::CreatedAt).all(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: UserChanges) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = get(db, id).await?.into();
    if let Some(name) = changes.name {
        user::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(email) = changes.email {
        user::validate_email(&email)?;
        am.email = Set(email.trim().to_lowercase());
    }
    if let Some(password) = changes.password {
        check_password(&password)?;
        am.password_hash = Set(hash(&password)?);
    }
    if let Some(role) = changes.role {
        am.role = Set(role);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Fails with a conflict while the user still owns companies; their bookings
/// are kept with the owner cleared.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "user")?;
    info!(user_id = %id, "user_deleted");
    Ok(())
}
