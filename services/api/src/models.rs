//! Row types and request payloads, one module per resource family.

pub mod blog;
pub mod gallery;
pub mod inquiry;
pub mod ledger;
pub mod project;
pub mod settings;
pub mod ticket;
pub mod user;

pub use user::{AuthUser, Role, User, UserSummary};
