use async_trait::async_trait;
use models::{booking, booking_service, company, company_service, service};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use super::guard::{OwnerLookup, Target};
use crate::errors::ServiceError;

/// Owner resolution backed by the database.
#[derive(Clone)]
pub struct SeaOrmOwnerLookup {
    pub db: DatabaseConnection,
}

impl SeaOrmOwnerLookup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn company_owner(&self, company_id: Uuid) -> Result<Uuid, ServiceError> {
        let c = company::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("company"))?;
        Ok(c.user_id)
    }

    async fn booking_owner(&self, booking_id: Uuid) -> Result<Option<Uuid>, ServiceError> {
        let b = booking::Entity::find_by_id(booking_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        Ok(b.user_id)
    }
}

#[async_trait]
impl OwnerLookup for SeaOrmOwnerLookup {
    async fn owners(&self, target: Target) -> Result<Vec<Uuid>, ServiceError> {
        match target {
            Target::Company(id) => Ok(vec![self.company_owner(id).await?]),
            Target::CompanyService(id) => {
                let cs = company_service::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("company_service"))?;
                Ok(vec![self.company_owner(cs.company_id).await?])
            }
            Target::Service(id) => {
                service::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("service"))?;
                // owners of every company offering this service
                let owners: Vec<Uuid> = company::Entity::find()
                    .join(JoinType::InnerJoin, company_service::Relation::Company.def().rev())
                    .filter(company_service::Column::ServiceId.eq(id))
                    .select_only()
                    .column(company::Column::UserId)
                    .distinct()
                    .into_tuple()
                    .all(&self.db)
                    .await?;
                Ok(owners)
            }
            Target::Booking(id) => Ok(self.booking_owner(id).await?.into_iter().collect()),
            Target::BookingService(id) => {
                let bs = booking_service::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("booking_service"))?;
                Ok(self.booking_owner(bs.booking_id).await?.into_iter().collect())
            }
        }
    }
}
