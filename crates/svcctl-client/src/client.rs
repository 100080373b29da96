//! The assembled API client.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use svcctl_core::{
    ApiUrl, BusyTracker, Navigator, NotificationCenter, Notifier, Result, Route, SessionStore,
};

use crate::api::{AdminApi, AuthApi, ProfileApi, ServicesApi};
use crate::config::ClientConfig;
use crate::middleware::{BearerAuth, Middleware, Next, RequestInterceptor};
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Client for the console API.
///
/// Every call runs through the same chain: the [`RequestInterceptor`]
/// first, then [`BearerAuth`], then any extra layers, then the transport.
/// Clones share the chain and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: ApiUrl,
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    busy: BusyTracker,
    middlewares: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Start building a client around `store`.
    pub fn builder(store: SessionStore) -> ApiClientBuilder {
        ApiClientBuilder::new(store)
    }

    pub fn base_url(&self) -> &ApiUrl {
        &self.inner.base_url
    }

    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    pub fn busy(&self) -> &BusyTracker {
        &self.inner.busy
    }

    pub(crate) fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    /// Run `request` through the whole chain.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        Next::new(&self.inner.middlewares, self.inner.transport.as_ref())
            .run(request)
            .await
    }

    /// Run `request` and decode the JSON body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn profile(&self) -> ProfileApi<'_> {
        ProfileApi::new(self)
    }

    pub fn services(&self) -> ServicesApi<'_> {
        ServicesApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("layers", &self.inner.middlewares.len())
            .finish()
    }
}

/// Navigator used when the embedder does not supply one.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Navigation requested");
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    store: SessionStore,
    config: ClientConfig,
    navigator: Option<Arc<dyn Navigator>>,
    notifier: Option<Arc<dyn Notifier>>,
    busy: Option<BusyTracker>,
    transport: Option<Arc<dyn Transport>>,
    layers: Vec<Arc<dyn Middleware>>,
}

impl ApiClientBuilder {
    fn new(store: SessionStore) -> Self {
        Self {
            store,
            config: ClientConfig::default(),
            navigator: None,
            notifier: None,
            busy: None,
            transport: None,
            layers: Vec::new(),
        }
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: ApiUrl) -> Self {
        self.config.base_url = base_url;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Where failure messages go. Defaults to a fresh [`NotificationCenter`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn busy(mut self, busy: BusyTracker) -> Self {
        self.busy = Some(busy);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Add a layer between bearer auth and the transport.
    pub fn layer(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.layers.push(middleware);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(LogNavigator));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(NotificationCenter::new()));
        let busy = self.busy.unwrap_or_default();

        let mut middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(RequestInterceptor::new(
                self.store.clone(),
                navigator.clone(),
                notifier,
                busy.clone(),
            )),
            Arc::new(BearerAuth::new(self.store.clone())),
        ];
        middlewares.extend(self.layers);

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url: self.config.base_url,
                store: self.store,
                navigator,
                busy,
                middlewares,
                transport,
            }),
        })
    }
}
