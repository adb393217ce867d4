//! Shared helpers used across the booking workspace: logging setup, runtime
//! environment checks and small wire types.

pub mod env;
pub mod types;
pub mod utils;
