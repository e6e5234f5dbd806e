//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories for tests and fixture mode
//! - **auth**: bearer token verification with `jsonwebtoken`
//!
//! Adapters translate between domain types and storage or wire shapes. They
//! contain no business logic.

pub mod auth;
pub mod memory;
pub mod persistence;
