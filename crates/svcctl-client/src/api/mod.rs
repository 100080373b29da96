//! Typed endpoint groups, borrowed from an [`ApiClient`](crate::ApiClient).

mod admin;
mod auth;
mod profile;
mod services;

pub use admin::AdminApi;
pub use auth::{AuthApi, RefreshCheck};
pub use profile::ProfileApi;
pub use services::ServicesApi;
