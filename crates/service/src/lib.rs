//! Service layer providing business-oriented operations on top of models.
//! - Authentication (credentials, tokens) and authorization (capability table, ownership guard).
//! - Thin per-entity repositories and reporting queries.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod authz;
pub mod repo;
pub mod analytics;
pub mod seed;
#[cfg(test)]
pub mod test_support;
