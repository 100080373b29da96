//! admin users | set-role | activate | deactivate

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use svcctl_core::Role;

use crate::output;
use crate::session::Console;

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// List user accounts
    Users {
        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Change a user's role (admin, user, tenant_admin)
    SetRole { user_id: String, role: Role },

    /// Re-enable a user account
    Activate { user_id: String },

    /// Disable a user account
    Deactivate { user_id: String },
}

pub async fn handle(cmd: AdminCommand, console: &Console) -> Result<()> {
    console.require_session().await?;
    let admin = console.client().admin();

    match cmd.command {
        AdminSubcommand::Users {
            limit,
            offset,
            json,
        } => {
            let list = admin.users(limit, offset).await?;
            for user in &list.users {
                if json {
                    output::json(user)?;
                } else {
                    let active = if user.is_active {
                        "active".green()
                    } else {
                        "inactive".dimmed()
                    };
                    println!("{}  {}  {}  {}", user.id, user.username, user.role, active);
                }
            }
        }
        AdminSubcommand::SetRole { user_id, role } => {
            let ack = admin.set_role(&user_id, role).await?;
            output::success(&ack.message);
        }
        AdminSubcommand::Activate { user_id } => {
            let ack = admin.activate(&user_id).await?;
            output::success(&ack.message);
        }
        AdminSubcommand::Deactivate { user_id } => {
            let ack = admin.deactivate(&user_id).await?;
            output::success(&ack.message);
        }
    }
    Ok(())
}
