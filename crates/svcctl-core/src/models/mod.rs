//! Request and response bodies of the console API.

pub mod admin;
pub mod auth;
pub mod service;

pub use admin::{UpdateRoleRequest, UserListResponse};
pub use auth::{
    LoginResponse, ProfileUpdate, RefreshRequest, RegisterRequest, RegisterResponse,
};
pub use service::{
    CreateServiceRequest, DashboardStats, DeploymentStatus, HealthCheckConfig, MessageResponse,
    ResourceConfig, ResourceKind, Service, ServiceConfig, ServiceDeployment, ServiceFilter,
    ServiceListResponse, ServiceLogsResponse, ServiceMetrics, ServiceMetricsResponse,
    ServiceStatus, ServiceTemplate, ServiceType, StartServiceResponse, TemplateListResponse,
    format_resource, parse_ports, validate_service_name,
};
