//! services, templates and dashboard.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use svcctl_core::models::{
    CreateServiceRequest, ResourceKind, Service, ServiceConfig, ServiceFilter, ServiceStatus,
    ServiceType, format_resource, parse_ports,
};

use crate::output;
use crate::session::Console;

#[derive(Args, Debug)]
pub struct ServicesCommand {
    #[command(subcommand)]
    pub command: ServicesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ServicesSubcommand {
    /// List services
    List(ListArgs),

    /// Show one service
    Get(IdArgs),

    /// Create a service from the defaults for its type
    Create(ServiceArgs),

    /// Replace a service definition
    Update(UpdateArgs),

    /// Delete a service
    Delete(IdArgs),

    /// Deploy a service
    Start(IdArgs),

    /// Stop a running service
    Stop(IdArgs),

    /// Restart a service
    Restart(IdArgs),

    /// Print recent log lines
    Logs(IdArgs),

    /// Show allocation metrics
    Metrics(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only services of this type
    #[arg(long = "type")]
    pub service_type: Option<ServiceType>,

    /// Only services in this state
    #[arg(long)]
    pub status: Option<ServiceStatus>,

    /// Match name or description
    #[arg(long)]
    pub search: Option<String>,

    /// One JSON object per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Service ID
    pub id: String,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service name (3-50 letters, digits, '-' or '_')
    pub name: String,

    #[arg(long = "type")]
    pub service_type: ServiceType,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Container image; defaults to the image for the type
    #[arg(long)]
    pub image: Option<String>,

    /// Comma-separated ports, e.g. "80,443"
    #[arg(long)]
    pub ports: Option<String>,

    /// Environment variable as KEY=VALUE, repeatable
    #[arg(long = "env", value_parser = parse_env)]
    pub env: Vec<(String, String)>,

    /// CPU in MHz
    #[arg(long)]
    pub cpu: Option<u32>,

    /// Memory in MB
    #[arg(long)]
    pub memory: Option<u32>,

    /// Disk in MB
    #[arg(long)]
    pub disk: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Service ID
    pub id: String,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct TemplatesCommand {
    #[command(subcommand)]
    pub command: TemplatesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesSubcommand {
    /// List available templates
    List,

    /// Show one template
    Get {
        /// Template ID
        id: String,
    },
}

fn parse_env(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl ServiceArgs {
    fn into_request(self) -> Result<CreateServiceRequest> {
        let mut config = ServiceConfig::default_for(self.service_type);
        if let Some(image) = self.image {
            config.image = image;
        }
        if let Some(ref ports) = self.ports {
            config.ports = parse_ports(ports)?;
        }
        config.environment.extend(self.env);
        if let Some(cpu) = self.cpu {
            config.resources.cpu = cpu;
        }
        if let Some(memory) = self.memory {
            config.resources.memory = memory;
        }
        if let Some(disk) = self.disk {
            config.resources.disk = disk;
        }

        if config.image.is_empty() {
            bail!("--image is required for {} services", self.service_type);
        }

        Ok(CreateServiceRequest {
            name: self.name,
            service_type: self.service_type,
            description: self.description,
            config,
        })
    }
}

pub async fn handle(cmd: ServicesCommand, console: &Console) -> Result<()> {
    console.require_session().await?;
    let services = console.client().services();

    match cmd.command {
        ServicesSubcommand::List(args) => {
            let filter = ServiceFilter {
                service_type: args.service_type,
                status: args.status,
                search: args.search,
            };
            let list = services.list(&filter).await?;
            for service in &list.services {
                if args.json {
                    output::json(service)?;
                } else {
                    println!(
                        "{}  {}  {}  {}",
                        service.id,
                        service.name,
                        service.service_type,
                        output::status(service.status)
                    );
                }
            }
            if !args.json {
                eprintln!("{} service(s)", list.total);
            }
        }
        ServicesSubcommand::Get(args) => {
            let service = services.get(&args.id).await?;
            if args.json {
                output::json_pretty(&service)?;
            } else {
                print_service(&service);
            }
        }
        ServicesSubcommand::Create(args) => {
            let request = args.into_request()?;
            let service = services.create(&request).await?;
            output::success(&format!("Created service {}", service.name));
            output::field("ID", &service.id);
        }
        ServicesSubcommand::Update(args) => {
            let request = args.service.into_request()?;
            let service = services.update(&args.id, &request).await?;
            output::success(&format!("Updated service {}", service.name));
        }
        ServicesSubcommand::Delete(args) => {
            let ack = services.delete(&args.id).await?;
            output::success(&ack.message);
        }
        ServicesSubcommand::Start(args) => {
            let started = services.start(&args.id).await?;
            output::success(&started.message);
            if let Some(deployment) = started.deployment {
                output::field("Deployment", &deployment.id);
                output::field("Job", &deployment.nomad_job_id);
            }
        }
        ServicesSubcommand::Stop(args) => {
            let ack = services.stop(&args.id).await?;
            output::success(&ack.message);
        }
        ServicesSubcommand::Restart(args) => {
            let ack = services.restart(&args.id).await?;
            output::success(&ack.message);
        }
        ServicesSubcommand::Logs(args) => {
            for line in services.logs(&args.id).await? {
                println!("{}", line);
            }
        }
        ServicesSubcommand::Metrics(args) => {
            let metrics = services.metrics(&args.id).await?;
            if args.json {
                output::json_pretty(&metrics)?;
            } else {
                output::field("CPU", &format!("{:.1}%", metrics.cpu_usage));
                output::field("Memory", &format!("{:.1} MB", metrics.memory_usage));
                output::field("Allocation", &metrics.allocation_id);
                output::field("Status", &metrics.allocation_status);
                output::field("Node", &metrics.node_id);
            }
        }
    }
    Ok(())
}

pub async fn handle_templates(cmd: TemplatesCommand, console: &Console) -> Result<()> {
    console.require_session().await?;
    let services = console.client().services();

    match cmd.command {
        TemplatesSubcommand::List => {
            let list = services.templates().await?;
            for template in &list.templates {
                println!(
                    "{}  {}  {}  {}",
                    template.id, template.name, template.service_type, template.category
                );
            }
        }
        TemplatesSubcommand::Get { id } => {
            let template = services
                .template(&id)
                .await
                .with_context(|| format!("Failed to fetch template {}", id))?;
            output::json_pretty(&template)?;
        }
    }
    Ok(())
}

pub async fn dashboard(console: &Console) -> Result<()> {
    console.require_session().await?;
    let stats = console.client().services().dashboard().await?;

    output::field("Total", &stats.total_services.to_string());
    output::field("Running", &stats.running_services.to_string());
    output::field("Stopped", &stats.stopped_services.to_string());
    output::field("Error", &stats.error_services.to_string());
    output::field("Pending", &stats.pending_services.to_string());
    Ok(())
}

fn print_service(service: &Service) {
    let resources = &service.config.resources;
    output::field("ID", &service.id);
    output::field("Name", &service.name);
    output::field("Type", service.service_type.as_str());
    output::field("Status", &output::status(service.status));
    if !service.description.is_empty() {
        output::field("Description", &service.description);
    }
    output::field("Image", &service.config.image);
    let ports: Vec<String> = service.config.ports.iter().map(u16::to_string).collect();
    output::field("Ports", &ports.join(", "));
    output::field("CPU", &format_resource(resources.cpu, ResourceKind::Cpu));
    output::field("Memory", &format_resource(resources.memory, ResourceKind::Memory));
    output::field("Disk", &format_resource(resources.disk, ResourceKind::Disk));
}
