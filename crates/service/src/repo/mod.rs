//! Thin persistence wrappers, one module per entity.
//!
//! Every function returns `ServiceError::NotFound` for a missing row and
//! `ServiceError::Conflict` when a constraint rejects the write.

pub mod users;
pub mod companies;
pub mod services;
pub mod company_services;
pub mod bookings;
pub mod booking_services;

use sea_orm::DeleteResult;
use serde::{Deserialize, Deserializer};

use crate::errors::ServiceError;

/// Keeps an explicit JSON `null` apart from an absent field: `null` becomes
/// `Some(None)` and clears the column, absence stays `None` via `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

pub(crate) fn ensure_deleted(res: DeleteResult, entity: &str) -> Result<(), ServiceError> {
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found(entity));
    }
    Ok(())
}
