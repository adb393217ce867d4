use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use super::policy::{rule_for, Action, Resource, Rule};
use crate::auth::Identity;
use crate::errors::ServiceError;

/// A concrete row whose owners decide an `OwnerOrAdmin` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Company(Uuid),
    Service(Uuid),
    CompanyService(Uuid),
    Booking(Uuid),
    BookingService(Uuid),
}

impl Target {
    pub fn entity(&self) -> &'static str {
        match self {
            Target::Company(_) => "company",
            Target::Service(_) => "service",
            Target::CompanyService(_) => "company_service",
            Target::Booking(_) => "booking",
            Target::BookingService(_) => "booking_service",
        }
    }
}

/// Resolves the set of users owning a target row.
///
/// Returns `NotFound` when the row itself does not exist; an empty set means
/// the row exists but nobody owns it.
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    async fn owners(&self, target: Target) -> Result<Vec<Uuid>, ServiceError>;
}

#[async_trait]
impl<T: OwnerLookup + ?Sized> OwnerLookup for Arc<T> {
    async fn owners(&self, target: Target) -> Result<Vec<Uuid>, ServiceError> {
        (**self).owners(target).await
    }
}

fn owns(who: &Identity, owners: &[Uuid]) -> bool {
    !owners.is_empty() && owners.iter().all(|o| *o == who.user_id)
}

pub struct Guard<L: OwnerLookup> {
    lookup: L,
}

impl<L: OwnerLookup> Guard<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Check a rule that needs no particular row.
    ///
    /// `OwnerOrAdmin` rules cannot be satisfied here without a target, so only
    /// admins pass them.
    pub fn allow(&self, who: &Identity, resource: Resource, action: Action) -> Result<(), ServiceError> {
        match rule_for(resource, action) {
            Some(Rule::Authenticated) => Ok(()),
            Some(Rule::AdminOnly) | Some(Rule::OwnerOrAdmin) if who.is_admin() => Ok(()),
            _ => Err(deny(who, resource, action)),
        }
    }

    /// Check a rule against a specific row. The row must exist, for admins too.
    pub async fn allow_on(
        &self,
        who: &Identity,
        resource: Resource,
        action: Action,
        target: Target,
    ) -> Result<(), ServiceError> {
        let rule = rule_for(resource, action).ok_or_else(|| deny(who, resource, action))?;
        let owners = self.lookup.owners(target).await?;
        match rule {
            Rule::Authenticated => Ok(()),
            _ if who.is_admin() => Ok(()),
            Rule::OwnerOrAdmin if owns(who, &owners) => Ok(()),
            _ => Err(deny(who, resource, action)),
        }
    }
}

fn deny(who: &Identity, resource: Resource, action: Action) -> ServiceError {
    warn!(
        event = "access_denied",
        user_id = %who.user_id,
        role = who.role.as_str(),
        %resource,
        action = ?action,
    );
    ServiceError::Forbidden(format!("not allowed to {action:?} {resource}"))
}

/// In-memory owner table for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MockOwnerLookup {
        pub owners: HashMap<Target, Vec<Uuid>>,
    }

    impl MockOwnerLookup {
        pub fn with(mut self, target: Target, owners: Vec<Uuid>) -> Self {
            self.owners.insert(target, owners);
            self
        }
    }

    #[async_trait]
    impl OwnerLookup for MockOwnerLookup {
        async fn owners(&self, target: Target) -> Result<Vec<Uuid>, ServiceError> {
            self.owners
                .get(&target)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(target.entity()))
        }
    }
}
