//! CLI argument definitions.

use clap::{Parser, Subcommand};

use svcctl_client::DEFAULT_API_URL;

use crate::commands::admin::AdminCommand;
use crate::commands::auth::{LoginArgs, RegisterArgs};
use crate::commands::profile::ProfileCommand;
use crate::commands::services::{ServicesCommand, TemplatesCommand};

/// Console for managing services on the orchestrator.
#[derive(Parser, Debug)]
#[command(name = "svcctl")]
#[command(author, version = env!("SVCCTL_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Base URL of the console API
    #[arg(long, env = "SVCCTL_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Allow plain HTTP to hosts other than localhost
    #[arg(long, env = "SVCCTL_ALLOW_INSECURE", global = true)]
    pub allow_insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Create a new account
    Register(RegisterArgs),

    /// Show the stored identity
    Whoami,

    /// Exchange the refresh token for a new session
    Refresh,

    /// Your own profile
    Profile(ProfileCommand),

    /// Service lifecycle
    Services(ServicesCommand),

    /// Service templates
    Templates(TemplatesCommand),

    /// Service counts by status
    Dashboard,

    /// User administration (admin only)
    Admin(AdminCommand),
}
