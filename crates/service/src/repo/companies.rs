use chrono::Utc;
use models::{company, company_service, service};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ensure_deleted;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Editable fields. The owner is deliberately absent: it never changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyChanges {
    #[serde(default)]
    pub name: Option<String>,
    /// `null` clears the address.
    #[serde(default, deserialize_with = "super::nullable")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
}

#[instrument(skip(db, input), fields(owner = %owner, name = %input.name))]
pub async fn create(db: &DatabaseConnection, owner: Uuid, input: NewCompany) -> Result<company::Model, ServiceError> {
    let created = company::create(db, owner, &input.name, input.address, input.description).await?;
    info!(company_id = %created.id, "company_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<company::Model>, ServiceError> {
    Ok(company::Entity::find().order_by_asc(company::Column::CreatedAt).all(db).await?)
}

/// Companies owned by `user_id`, filtered in the query by the indexed owner column.
pub async fn list_by_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<company::Model>, ServiceError> {
    Ok(company::Entity::find()
        .filter(company::Column::UserId.eq(user_id))
        .order_by_asc(company::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<company::Model, ServiceError> {
    company::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("company"))
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: CompanyChanges) -> Result<company::Model, ServiceError> {
    let mut am: company::ActiveModel = get(db, id).await?.into();
    if let Some(name) = changes.name {
        company::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(address) = changes.address {
        am.address = Set(address);
    }
    if let Some(description) = changes.description {
        am.description = Set(description);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Offerings cascade away with the company unless a booking still references one,
/// in which case the delete is rejected as a conflict.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = company::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "company")?;
    info!(company_id = %id, "company_deleted");
    Ok(())
}

/// Services offered by a company.
pub async fn list_services(db: &DatabaseConnection, company_id: Uuid) -> Result<Vec<service::Model>, ServiceError> {
    get(db, company_id).await?;
    Ok(service::Entity::find()
        .join(JoinType::InnerJoin, company_service::Relation::Service.def().rev())
        .filter(company_service::Column::CompanyId.eq(company_id))
        .order_by_asc(service::Column::Title)
        .all(db)
        .await?)
}
