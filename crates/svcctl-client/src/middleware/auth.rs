//! Bearer token attachment.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::trace;

use svcctl_core::error::InvalidInputError;
use svcctl_core::{Result, SessionStore};

use super::{Middleware, Next};
use crate::request::{ApiRequest, ApiResponse};

/// Adds `Authorization: Bearer <token>` while a session is active.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    store: SessionStore,
}

impl BearerAuth {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(&self, mut request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
        if let Some(token) = self.store.access_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| InvalidInputError::Other {
                    message: "access token contains invalid header characters".to_string(),
                })?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
            trace!("attached bearer token");
        }
        next.run(request).await
    }
}
