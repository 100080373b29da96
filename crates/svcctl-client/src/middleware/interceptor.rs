//! Uniform recovery for failed calls.
//!
//! The interceptor is the outermost layer. It drives the busy indicator,
//! turns transport and status failures into one user-facing [`ApiError`],
//! tears the session down on a 401 and tells the user what went wrong.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, warn};

use svcctl_core::error::Error;
use svcctl_core::{
    ApiError, BusyTracker, Navigator, NotificationKind, Notifier, Result, Route, SessionStore,
};

use super::{Middleware, Next};
use crate::request::{ApiRequest, ApiResponse};

/// Endpoints whose callers report failures themselves.
const SILENT_ENDPOINTS: [&str; 2] = ["/auth/login", "/auth/refresh"];

/// Paths that turn the busy indicator on even for reads.
const BUSY_PATHS: [&str; 2] = ["/logs", "/metrics"];

const UNEXPECTED: &str = "An unexpected error occurred";

/// What the interceptor needs to remember about a call while it is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    /// Failures are not notified.
    pub is_silent: bool,
    /// The call holds the busy indicator.
    pub is_busy: bool,
}

impl RequestContext {
    pub fn from_request(request: &ApiRequest) -> Self {
        let path = request.path.clone();
        Self {
            is_silent: SILENT_ENDPOINTS.iter().any(|e| path.contains(e)),
            is_busy: request.method != Method::GET || BUSY_PATHS.iter().any(|p| path.contains(p)),
            method: request.method.clone(),
            path,
        }
    }
}

/// Classify a failure into the message shown to the user.
///
/// Returns `None` for errors that did not come from an HTTP exchange; those
/// are passed through untouched.
pub fn classify(error: &Error) -> Option<ApiError> {
    let (status, detail, description) = match error {
        Error::Transport(err) => (0, None, Some(err.to_string())),
        Error::Status(err) => (err.status, err.detail.clone(), Some(err.message.clone())),
        _ => return None,
    };

    let message = match status {
        0 => "Unable to connect to the server. Please check your connection.".to_string(),
        401 => "Your session has expired. Please log in again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested resource was not found.".to_string(),
        409 => detail.unwrap_or_else(|| {
            "A conflict occurred. The resource may already exist.".to_string()
        }),
        422 => detail.unwrap_or_else(|| "Invalid data provided.".to_string()),
        500 => "Internal server error. Please try again later.".to_string(),
        503 => "Service temporarily unavailable. Please try again later.".to_string(),
        _ => detail
            .or(description.filter(|d| !d.is_empty()))
            .unwrap_or_else(|| UNEXPECTED.to_string()),
    };

    Some(ApiError::new(message, status))
}

/// The error-recovery middleware.
pub struct RequestInterceptor {
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    busy: BusyTracker,
}

impl RequestInterceptor {
    pub fn new(
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        busy: BusyTracker,
    ) -> Self {
        Self {
            store,
            navigator,
            notifier,
            busy,
        }
    }

    fn recover(&self, ctx: &RequestContext, api_error: &ApiError) {
        if api_error.status == 401 {
            // Clearing logs its own storage failure; the session is gone from memory either way.
            let _ = self.store.clear_session();
            self.navigator.navigate(Route::Login);
        }

        if !ctx.is_silent {
            self.notifier.notify(NotificationKind::Error, &api_error.error);
        }
    }
}

#[async_trait]
impl Middleware for RequestInterceptor {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
        let ctx = RequestContext::from_request(&request);
        let busy = ctx.is_busy.then(|| self.busy.begin());
        let start = Instant::now();

        let result = next.run(request).await;

        drop(busy);
        let duration_ms = start.elapsed().as_millis();

        let error = match result {
            Ok(response) => {
                info!(
                    method = %ctx.method,
                    path = %ctx.path,
                    status = response.status,
                    duration_ms = %duration_ms,
                    "HTTP request"
                );
                return Ok(response);
            }
            Err(error) => error,
        };

        let Some(api_error) = classify(&error) else {
            warn!(method = %ctx.method, path = %ctx.path, %error, "Request failed before reaching the server");
            return Err(error);
        };

        info!(
            method = %ctx.method,
            path = %ctx.path,
            status = api_error.status,
            duration_ms = %duration_ms,
            "HTTP request failed"
        );

        self.recover(&ctx, &api_error);
        Err(Error::Api(api_error))
    }
}
