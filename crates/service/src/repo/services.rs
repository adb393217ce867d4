use chrono::Utc;
use models::{company, company_service, service};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::ensure_deleted;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Offer the new service from this company straight away.
    #[serde(default)]
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create(db: &DatabaseConnection, input: NewService) -> Result<service::Model, ServiceError> {
    let txn = db.begin().await?;
    let created = service::create(&txn, &input.title, input.description, input.price).await?;
    if let Some(company_id) = input.company_id {
        company::Entity::find_by_id(company_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("company"))?;
        company_service::create(&txn, company_id, created.id, None).await?;
    }
    txn.commit().await?;
    info!(service_id = %created.id, offered_by = ?input.company_id, "service_created");
    Ok(created)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<service::Model>, ServiceError> {
    Ok(service::Entity::find().order_by_asc(service::Column::Title).all(db).await?)
}

/// Services offered by any company the user owns.
pub async fn list_by_owner(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<service::Model>, ServiceError> {
    Ok(service::Entity::find()
        .join(JoinType::InnerJoin, company_service::Relation::Service.def().rev())
        .join(JoinType::InnerJoin, company_service::Relation::Company.def())
        .filter(company::Column::UserId.eq(user_id))
        .distinct()
        .order_by_asc(service::Column::Title)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

pub async fn update(db: &DatabaseConnection, id: Uuid, changes: ServiceChanges) -> Result<service::Model, ServiceError> {
    let mut am: service::ActiveModel = get(db, id).await?.into();
    if let Some(title) = changes.title {
        service::validate_title(&title)?;
        am.title = Set(title.trim().to_string());
    }
    if let Some(description) = changes.description {
        am.description = Set(Some(description));
    }
    if let Some(price) = changes.price {
        service::validate_price(price)?;
        am.price = Set(price);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = service::Entity::delete_by_id(id).exec(db).await?;
    ensure_deleted(res, "service")?;
    info!(service_id = %id, "service_deleted");
    Ok(())
}

/// Companies offering a service.
pub async fn list_companies(db: &DatabaseConnection, service_id: Uuid) -> Result<Vec<company::Model>, ServiceError> {
    get(db, service_id).await?;
    Ok(company::Entity::find()
        .join(JoinType::InnerJoin, company_service::Relation::Company.def().rev())
        .filter(company_service::Column::ServiceId.eq(service_id))
        .order_by_asc(company::Column::Name)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_user};
    use models::user::Role;

    fn new_service(title: &str, company_id: Option<Uuid>) -> NewService {
        NewService { title: title.into(), description: None, price: 100.0, company_id }
    }

    #[tokio::test]
    async fn create_with_company_offers_it() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = make_user(&db, "a@example.com", Role::Customer).await?;
        let c = company::create(&db, a.id, "Golf Oilfield", None, None).await?;

        let s = create(&db, new_service("Snubbing", Some(c.id))).await?;
        let offered_by: Vec<Uuid> = list_companies(&db, s.id).await?.into_iter().map(|c| c.id).collect();
        assert_eq!(offered_by, vec![c.id]);

        let bare = create(&db, new_service("Nitrogen", None)).await?;
        assert!(list_companies(&db, bare.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_with_unknown_company_rolls_back() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create(&db, new_service("Phantom", Some(Uuid::new_v4()))).await;
        assert!(matches!(err, Err(ServiceError::NotFound(_))));
        assert!(list(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_by_owner_is_distinct_and_scoped() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = make_user(&db, "a@example.com", Role::Customer).await?;
        let b = make_user(&db, "b@example.com", Role::Customer).await?;
        let a1 = company::create(&db, a.id, "A1", None, None).await?;
        let a2 = company::create(&db, a.id, "A2", None, None).await?;
        let b1 = company::create(&db, b.id, "B1", None, None).await?;
        let shared = service::create(&db, "Acidizing", None, 1.0).await?;
        let only_b = service::create(&db, "Perforating", None, 1.0).await?;
        company_service::create(&db, a1.id, shared.id, None).await?;
        company_service::create(&db, a2.id, shared.id, None).await?;
        company_service::create(&db, b1.id, shared.id, None).await?;
        company_service::create(&db, b1.id, only_b.id, None).await?;

        let mine: Vec<Uuid> = list_by_owner(&db, a.id).await?.into_iter().map(|s| s.id).collect();
        assert_eq!(mine, vec![shared.id]);
        assert_eq!(list_by_owner(&db, b.id).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_price() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let s = create(&db, new_service("Logging", None)).await?;
        let bad = update(&db, s.id, ServiceChanges { price: Some(-5.0), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        let ok = update(&db, s.id, ServiceChanges { price: Some(75.5), ..Default::default() }).await?;
        assert_eq!(ok.price, 75.5);
        Ok(())
    }
}
