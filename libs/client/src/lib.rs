//! Client-side session handling for the Atelier site backend.
//!
//! The browser build of the admin console keeps its bearer token in a local
//! key-value store together with a mirrored expiration timestamp. This crate
//! is the same contract for native tooling: a capability-probed token store
//! that self-invalidates on expiry, and an HTTP client that attaches the
//! stored token to every API call.

pub mod api;
pub mod store;

pub use api::{ApiClient, ClientError, UserProfile};
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore};
