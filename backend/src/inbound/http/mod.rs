//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod benchmarks;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod training_results;
pub mod trainings;
pub mod user_results;
pub mod users;
pub mod validation;

pub use error::ApiResult;
