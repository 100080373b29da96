//! Service lifecycle, templates and the dashboard summary.

use tracing::instrument;

use svcctl_core::Result;
use svcctl_core::models::{
    CreateServiceRequest, DashboardStats, MessageResponse, Service, ServiceFilter,
    ServiceListResponse, ServiceLogsResponse, ServiceMetrics, ServiceMetricsResponse,
    ServiceTemplate, StartServiceResponse, TemplateListResponse,
};

use crate::client::ApiClient;
use crate::request::ApiRequest;

pub struct ServicesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ServicesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filter: &ServiceFilter) -> Result<ServiceListResponse> {
        self.client
            .fetch(ApiRequest::get("/services").query(filter.to_query()))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Service> {
        self.client
            .fetch(ApiRequest::get(format!("/services/{}", id)))
            .await
    }

    /// Create a service. The name and ports are checked before sending.
    #[instrument(skip_all, fields(name = %request.name))]
    pub async fn create(&self, request: &CreateServiceRequest) -> Result<Service> {
        request.validate()?;
        self.client
            .fetch(ApiRequest::post("/services").json(request)?)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: &str, request: &CreateServiceRequest) -> Result<Service> {
        request.validate()?;
        self.client
            .fetch(ApiRequest::put(format!("/services/{}", id)).json(request)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<MessageResponse> {
        self.client
            .fetch(ApiRequest::delete(format!("/services/{}", id)))
            .await
    }

    pub async fn start(&self, id: &str) -> Result<StartServiceResponse> {
        self.client
            .fetch(ApiRequest::post(format!("/services/{}/start", id)))
            .await
    }

    pub async fn stop(&self, id: &str) -> Result<MessageResponse> {
        self.client
            .fetch(ApiRequest::post(format!("/services/{}/stop", id)))
            .await
    }

    pub async fn restart(&self, id: &str) -> Result<MessageResponse> {
        self.client
            .fetch(ApiRequest::post(format!("/services/{}/restart", id)))
            .await
    }

    pub async fn logs(&self, id: &str) -> Result<Vec<String>> {
        let response: ServiceLogsResponse = self
            .client
            .fetch(ApiRequest::get(format!("/services/{}/logs", id)))
            .await?;
        Ok(response.logs)
    }

    pub async fn metrics(&self, id: &str) -> Result<ServiceMetrics> {
        let response: ServiceMetricsResponse = self
            .client
            .fetch(ApiRequest::get(format!("/services/{}/metrics", id)))
            .await?;
        Ok(response.metrics)
    }

    pub async fn templates(&self) -> Result<TemplateListResponse> {
        self.client.fetch(ApiRequest::get("/templates")).await
    }

    pub async fn template(&self, id: &str) -> Result<ServiceTemplate> {
        self.client
            .fetch(ApiRequest::get(format!("/templates/{}", id)))
            .await
    }

    /// Dashboard counts, computed from the full service list.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let list = self.list(&ServiceFilter::default()).await?;
        Ok(DashboardStats::from_services(&list.services))
    }
}
