//! Service, deployment and template bodies, plus the helpers the console
//! uses to validate and present them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};

/// Kind of workload a service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Database,
    WebServer,
    MessageQueue,
    Monitoring,
    Devops,
    Custom,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Database => "database",
            ServiceType::WebServer => "web_server",
            ServiceType::MessageQueue => "message_queue",
            ServiceType::Monitoring => "monitoring",
            ServiceType::Devops => "devops",
            ServiceType::Custom => "custom",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "database" => Ok(ServiceType::Database),
            "web_server" => Ok(ServiceType::WebServer),
            "message_queue" => Ok(ServiceType::MessageQueue),
            "monitoring" => Ok(ServiceType::Monitoring),
            "devops" => Ok(ServiceType::Devops),
            "custom" => Ok(ServiceType::Custom),
            other => Err(InvalidInputError::Other {
                message: format!("unknown service type '{}'", other),
            }
            .into()),
        }
    }
}

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Running,
    Stopped,
    Error,
    Pending,
    #[serde(other)]
    Unknown,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "running",
            ServiceStatus::Stopped => "stopped",
            ServiceStatus::Error => "error",
            ServiceStatus::Pending => "pending",
            ServiceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ServiceStatus::Running),
            "stopped" => Ok(ServiceStatus::Stopped),
            "error" => Ok(ServiceStatus::Error),
            "pending" => Ok(ServiceStatus::Pending),
            other => Err(InvalidInputError::Other {
                message: format!("unknown service status '{}'", other),
            }
            .into()),
        }
    }
}

/// CPU in MHz, memory and disk in MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub cpu: u32,
    pub memory: u32,
    pub disk: u32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            cpu: 250,
            memory: 512,
            disk: 1024,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

/// How a service is deployed onto the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub image: String,
    #[serde(default)]
    pub ports: Vec<u16>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    #[serde(default)]
    pub resources: ResourceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheckConfig>,
    #[serde(default)]
    pub nomad_job_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_variables: Option<BTreeMap<String, String>>,
}

impl ServiceConfig {
    /// A starting configuration for a new service of `service_type`.
    pub fn default_for(service_type: ServiceType) -> Self {
        let (image, port, env, resources, job_file): (&str, u16, &[(&str, &str)], _, &str) =
            match service_type {
                ServiceType::Database => (
                    "postgres:13",
                    5432,
                    &[
                        ("POSTGRES_USER", "user"),
                        ("POSTGRES_PASSWORD", "password"),
                        ("POSTGRES_DB", "database"),
                    ],
                    ResourceConfig {
                        cpu: 500,
                        memory: 1024,
                        disk: 2048,
                    },
                    "postgresql.nomad",
                ),
                ServiceType::WebServer => (
                    "nginx:alpine",
                    80,
                    &[],
                    ResourceConfig::default(),
                    "nginx.nomad",
                ),
                ServiceType::MessageQueue => (
                    "redis:alpine",
                    6379,
                    &[],
                    ResourceConfig::default(),
                    "redis.nomad",
                ),
                _ => ("", 8080, &[], ResourceConfig::default(), "generic.nomad"),
            };

        Self {
            image: image.to_string(),
            ports: vec![port],
            environment: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            volumes: None,
            resources,
            health_check: None,
            nomad_job_file: job_file.to_string(),
            custom_variables: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// One attempt to run a service on the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeployment {
    pub id: String,
    pub service_id: String,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub nomad_job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    #[serde(default)]
    pub deployed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub status: ServiceStatus,
    #[serde(default)]
    pub description: String,
    pub config: ServiceConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments: Option<Vec<ServiceDeployment>>,
}

/// Body of `POST /services` and `PUT /services/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub description: String,
    pub config: ServiceConfig,
}

impl CreateServiceRequest {
    /// Check the fields the server would otherwise reject.
    pub fn validate(&self) -> Result<(), Error> {
        validate_service_name(&self.name)?;
        if self.config.ports.contains(&0) {
            return Err(InvalidInputError::Ports {
                value: "0".to_string(),
                reason: "ports must be between 1 and 65535".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Filter for `GET /services`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub service_type: Option<ServiceType>,
    pub status: Option<ServiceStatus>,
    pub search: Option<String>,
}

impl ServiceFilter {
    /// Query parameters for the set fields.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(t) = self.service_type {
            query.push(("type".to_string(), t.to_string()));
        }
        if let Some(s) = self.status {
            query.push(("status".to_string(), s.to_string()));
        }
        if let Some(ref search) = self.search {
            query.push(("search".to_string(), search.clone()));
        }
        query
    }

    /// Apply the same filter to services already in memory.
    pub fn matches(&self, service: &Service) -> bool {
        self.service_type.is_none_or(|t| service.service_type == t)
            && self.status.is_none_or(|s| service.status == s)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                service.name.to_lowercase().contains(&needle)
                    || service.description.to_lowercase().contains(&needle)
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceListResponse {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub total: usize,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartServiceResponse {
    pub message: String,
    #[serde(default)]
    pub deployment: Option<ServiceDeployment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetrics {
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub allocation_id: String,
    #[serde(default)]
    pub allocation_status: String,
    #[serde(default)]
    pub node_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceMetricsResponse {
    pub metrics: ServiceMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub config: ServiceConfig,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateListResponse {
    #[serde(default)]
    pub templates: Vec<ServiceTemplate>,
    #[serde(default)]
    pub total: usize,
}

/// Summary counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_services: usize,
    pub running_services: usize,
    pub stopped_services: usize,
    pub error_services: usize,
    pub pending_services: usize,
    pub recent_deployments: Vec<ServiceDeployment>,
}

impl DashboardStats {
    /// Number of deployments kept in `recent_deployments`.
    pub const RECENT_DEPLOYMENTS: usize = 5;

    pub fn from_services(services: &[Service]) -> Self {
        let count = |status| services.iter().filter(|s| s.status == status).count();

        let mut recent: Vec<ServiceDeployment> = services
            .iter()
            .flat_map(|s| s.deployments.iter().flatten().cloned())
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(Self::RECENT_DEPLOYMENTS);

        Self {
            total_services: services.len(),
            running_services: count(ServiceStatus::Running),
            stopped_services: count(ServiceStatus::Stopped),
            error_services: count(ServiceStatus::Error),
            pending_services: count(ServiceStatus::Pending),
            recent_deployments: recent,
        }
    }
}

/// Service names are 3 to 50 characters of letters, digits, `-` and `_`,
/// starting and ending with a letter or digit.
pub fn validate_service_name(name: &str) -> Result<(), Error> {
    let invalid = |reason: &str| -> Error {
        InvalidInputError::ServiceName {
            value: name.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    let len = name.chars().count();
    if !(3..=50).contains(&len) {
        return Err(invalid("must be between 3 and 50 characters"));
    }

    let bytes = name.as_bytes();
    let edges_ok = bytes[0].is_ascii_alphanumeric() && bytes[bytes.len() - 1].is_ascii_alphanumeric();
    if !edges_ok {
        return Err(invalid("must start and end with a letter or digit"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("may only contain letters, digits, '-' and '_'"));
    }

    Ok(())
}

/// Parse a comma-separated port list such as `"80, 443"`.
pub fn parse_ports(ports: &str) -> Result<Vec<u16>, Error> {
    ports
        .split(',')
        .map(|p| {
            let p = p.trim();
            match p.parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(InvalidInputError::Ports {
                    value: ports.to_string(),
                    reason: format!("'{}' is not a port between 1 and 65535", p),
                }
                .into()),
            }
        })
        .collect()
}

/// Unit family of a resource value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cpu,
    Memory,
    Disk,
}

/// Render a resource amount with a readable unit.
pub fn format_resource(value: u32, kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Memory | ResourceKind::Disk if value >= 1024 => {
            format!("{:.1} GB", f64::from(value) / 1024.0)
        }
        ResourceKind::Memory | ResourceKind::Disk => format!("{} MB", value),
        ResourceKind::Cpu if value >= 1000 => format!("{:.1} GHz", f64::from(value) / 1000.0),
        ResourceKind::Cpu => format!("{} MHz", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(name: &str, status: ServiceStatus) -> Service {
        Service {
            id: format!("id-{}", name),
            name: name.to_string(),
            service_type: ServiceType::WebServer,
            status,
            description: String::new(),
            config: ServiceConfig::default_for(ServiceType::WebServer),
            tenant_id: None,
            created_by: "u-1".to_string(),
            created_at: None,
            updated_at: None,
            deployments: None,
        }
    }

    #[test]
    fn parses_service_from_api() {
        let svc: Service = serde_json::from_value(json!({
            "id": "3f6c",
            "name": "orders-db",
            "type": "database",
            "status": "running",
            "description": "Orders",
            "config": {
                "image": "postgres:13",
                "ports": [5432],
                "environment": {"POSTGRES_DB": "orders"},
                "resources": {"cpu": 500, "memory": 1024, "disk": 2048},
                "nomad_job_file": "postgresql.nomad"
            },
            "tenant_id": null,
            "created_by": "u-1",
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(svc.service_type, ServiceType::Database);
        assert_eq!(svc.config.ports, vec![5432]);
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let status: ServiceStatus = serde_json::from_value(json!("draining")).unwrap();
        assert_eq!(status, ServiceStatus::Unknown);
    }

    #[test]
    fn service_name_rules() {
        assert!(validate_service_name("web-01").is_ok());
        assert!(validate_service_name("a_b").is_ok());
        assert!(validate_service_name("ab").is_err());
        assert!(validate_service_name("-web").is_err());
        assert!(validate_service_name("web_").is_err());
        assert!(validate_service_name("web server").is_err());
        assert!(validate_service_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn port_lists() {
        assert_eq!(parse_ports("80, 443").unwrap(), vec![80, 443]);
        assert!(parse_ports("0").is_err());
        assert!(parse_ports("80,").is_err());
        assert!(parse_ports("70000").is_err());
        assert!(parse_ports("http").is_err());
    }

    #[test]
    fn resource_formatting() {
        assert_eq!(format_resource(512, ResourceKind::Memory), "512 MB");
        assert_eq!(format_resource(2048, ResourceKind::Disk), "2.0 GB");
        assert_eq!(format_resource(250, ResourceKind::Cpu), "250 MHz");
        assert_eq!(format_resource(1500, ResourceKind::Cpu), "1.5 GHz");
    }

    #[test]
    fn default_configs() {
        let db = ServiceConfig::default_for(ServiceType::Database);
        assert_eq!(db.image, "postgres:13");
        assert_eq!(db.environment["POSTGRES_DB"], "database");

        let custom = ServiceConfig::default_for(ServiceType::Custom);
        assert_eq!(custom.ports, vec![8080]);
        assert_eq!(custom.nomad_job_file, "generic.nomad");
    }

    #[test]
    fn filter_query_and_matching() {
        let filter = ServiceFilter {
            service_type: Some(ServiceType::WebServer),
            status: Some(ServiceStatus::Running),
            search: Some("API".to_string()),
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("type".to_string(), "web_server".to_string()),
                ("status".to_string(), "running".to_string()),
                ("search".to_string(), "API".to_string()),
            ]
        );

        assert!(filter.matches(&service("public-api", ServiceStatus::Running)));
        assert!(!filter.matches(&service("public-api", ServiceStatus::Stopped)));
        assert!(!filter.matches(&service("frontend", ServiceStatus::Running)));
        assert!(ServiceFilter::default().matches(&service("anything", ServiceStatus::Error)));
    }

    #[test]
    fn dashboard_counts_by_status() {
        let services = vec![
            service("web-1", ServiceStatus::Running),
            service("web-2", ServiceStatus::Running),
            service("web-3", ServiceStatus::Stopped),
            service("web-4", ServiceStatus::Error),
            service("web-5", ServiceStatus::Pending),
        ];

        let stats = DashboardStats::from_services(&services);
        assert_eq!(stats.total_services, 5);
        assert_eq!(stats.running_services, 2);
        assert_eq!(stats.stopped_services, 1);
        assert_eq!(stats.error_services, 1);
        assert_eq!(stats.pending_services, 1);
        assert!(stats.recent_deployments.is_empty());
    }
}
