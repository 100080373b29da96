//! svcctl-client - HTTP client for the service console API.
//!
//! Requests pass through an explicit middleware chain ending in a
//! [`Transport`]. The [`RequestInterceptor`] at the head of the chain
//! normalizes failures into [`ApiError`](svcctl_core::ApiError), notifies
//! the user and ends the session on a 401. Typed endpoint groups hang off
//! [`ApiClient`].
//!
//! # Example
//!
//! ```no_run
//! use svcctl_client::ApiClient;
//! use svcctl_core::{Credentials, MemoryStorage, SessionStore};
//!
//! # async fn example() -> svcctl_core::Result<()> {
//! let store = SessionStore::new(MemoryStorage::new());
//! let client = ApiClient::builder(store).build()?;
//!
//! client.auth().login(&Credentials::new("alice", "hunter22")).await?;
//! let services = client.services().list(&Default::default()).await?;
//! println!("{} services", services.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod middleware;

mod client;
mod request;
mod transport;

pub use api::{AdminApi, AuthApi, ProfileApi, RefreshCheck, ServicesApi};
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use middleware::{BearerAuth, Middleware, Next, RequestInterceptor};
pub use request::{ApiRequest, ApiResponse};
pub use transport::{ReqwestTransport, Transport};
