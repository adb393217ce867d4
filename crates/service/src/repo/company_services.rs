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
pub struct NewCompanyService {
    pub company_id: Uuid,
    pub service_id: Uuid,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Only the price override is editable; the company and service are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyServiceChanges {
    pub price: Option<f64>,
}

#[instrument(skip(db, input), fields(company_id = %input.company_id, service_id = %input.service_id))]
pub async fn create(db: &DatabaseConnection, input: NewCompanyService) -> Result<company_service::Model, ServiceError> {
    company::Entity::find_by_id(input.company_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("company"))?;
    service::Entity::find_by_id(input.service_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    let created = company_service::create(db, input.company_id, input.service_id, input.price).await?;
    info!(company_service_id = %created.id, "company_service_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<company_service::Model>, ServiceError> {
    Ok(company_service::Entity::find()
        .order_by_asc(company_service::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Offerings of companies owned by `user_id`.
pub async fn list_by_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<company_service::Model>, ServiceError> {
    Ok(company_service::Entity::find()
        .join(JoinType::InnerJoin, company_service::Relation::Company.def())
        .filter(company::Column::UserId.eq(user_id))
        .order_by_asc(company_service::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<company_service::Model, ServiceError> {
    company_service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("company_service"))
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    changes: CompanyServiceChanges,
) -> Result<company_service::Model, ServiceError> {
    let mut am: company_service::ActiveModel = get(db, id).await?.into();
    if let Some(price) = changes.price {
        service::validate_price(price)?;
        am.price = Set(Some(price));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Rejected as a conflict while any booking line references the offering.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = company_service::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "company_service")
}
