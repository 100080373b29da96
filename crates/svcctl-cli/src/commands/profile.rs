//! profile show | update

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use svcctl_core::models::ProfileUpdate;

use super::auth::print_identity;
use crate::output;
use crate::session::Console;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Fetch your profile from the server
    Show,

    /// Change your name or email; omitted fields keep their current value
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

pub async fn handle(cmd: ProfileCommand, console: &Console) -> Result<()> {
    console.require_session().await?;

    match cmd.command {
        ProfileSubcommand::Show => {
            let user = console.client().profile().me().await?;
            print_identity(&user);
        }
        ProfileSubcommand::Update(args) => {
            let current = console
                .store()
                .identity()
                .context("No active session")?;
            let update = ProfileUpdate {
                first_name: args.first_name.unwrap_or(current.first_name),
                last_name: args.last_name.unwrap_or(current.last_name),
                email: args.email.unwrap_or(current.email),
            };

            let user = console.client().profile().update(&update).await?;
            output::success("Profile updated");
            println!();
            print_identity(&user);
        }
    }
    Ok(())
}
