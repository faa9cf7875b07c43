//! Core business logic for assetdesk.
//!
//! Services enforce authorization and lifecycle rules on top of the
//! repositories in `assetdesk-db`. Callers are passed in as resolved
//! [`user::Model`](assetdesk_db::entities::user::Model) values; the HTTP
//! layer is responsible for authenticating them first.

pub mod services;

pub use services::*;
