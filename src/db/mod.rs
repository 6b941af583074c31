//! Database module: read-only access to the `users` table.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for bootstrapping the table (tests, first deploy)
//! - `store.rs`: the credential store; one connection per call, no pooling

pub mod models;
pub mod schema;
pub mod store;

pub use models::UserRecord;
pub use schema::USERS_INIT;
pub use store::{AuthOutcome, CredentialStore};
