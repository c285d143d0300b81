//! Shared infrastructure for the Atelier site backend.
//!
//! This crate holds the pieces every service-side binary needs: PostgreSQL
//! pool construction and the shared database error type. Everything here is
//! configured from environment variables so deployments stay twelve-factor.

pub mod database;
pub mod error;
