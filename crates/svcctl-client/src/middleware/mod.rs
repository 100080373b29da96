//! An explicit request pipeline.
//!
//! Each [`Middleware`] receives the request and a [`Next`] handle for the
//! rest of the chain, and decides what to do before and after calling
//! [`Next::run`]. The last link is the [`Transport`].

mod auth;
mod interceptor;

use std::sync::Arc;

use async_trait::async_trait;

use svcctl_core::Result;

use crate::request::{ApiRequest, ApiResponse};
use crate::transport::Transport;

pub use auth::BearerAuth;
pub use interceptor::{RequestContext, RequestInterceptor, classify};

/// One layer of the request pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: ApiRequest, next: Next<'_>) -> Result<ApiResponse>;
}

/// The remainder of the chain after the current middleware.
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub(crate) fn new(middlewares: &'a [Arc<dyn Middleware>], transport: &'a dyn Transport) -> Self {
        Self {
            middlewares,
            transport,
        }
    }

    /// Pass `request` to the next layer.
    pub async fn run(self, request: ApiRequest) -> Result<ApiResponse> {
        match self.middlewares.split_first() {
            Some((current, rest)) => {
                current
                    .handle(request, Next::new(rest, self.transport))
                    .await
            }
            None => self.transport.send(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Echo;

    #[async_trait]
    impl Transport for Echo {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            Ok(ApiResponse::new(200, request.path.into_bytes()))
        }
    }

    struct Tag {
        name: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(&self, mut request: ApiRequest, next: Next<'_>) -> Result<ApiResponse> {
            self.seen.lock().unwrap().push(format!("{} in", self.name));
            request.path.push_str(self.name);
            let response = next.run(request).await;
            self.seen.lock().unwrap().push(format!("{} out", self.name));
            response
        }
    }

    #[tokio::test]
    async fn layers_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tag {
                name: "a",
                seen: seen.clone(),
            }),
            Arc::new(Tag {
                name: "b",
                seen: seen.clone(),
            }),
        ];

        let response = Next::new(&chain, &Echo)
            .run(ApiRequest::get("/"))
            .await
            .unwrap();

        assert_eq!(response.body, b"/ab");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a in", "b in", "b out", "a out"]
        );
    }
}
