//! Subcommand implementations.

pub mod admin;
pub mod auth;
pub mod profile;
pub mod services;

use anyhow::Result;

use crate::cli::Commands;
use crate::session::Console;

pub async fn dispatch(command: Commands, console: &Console) -> Result<()> {
    match command {
        Commands::Login(args) => auth::login(args, console).await,
        Commands::Logout => auth::logout(console),
        Commands::Register(args) => auth::register(args, console).await,
        Commands::Whoami => auth::whoami(console),
        Commands::Refresh => auth::refresh(console).await,
        Commands::Profile(cmd) => profile::handle(cmd, console).await,
        Commands::Services(cmd) => services::handle(cmd, console).await,
        Commands::Templates(cmd) => services::handle_templates(cmd, console).await,
        Commands::Dashboard => services::dashboard(console).await,
        Commands::Admin(cmd) => admin::handle(cmd, console).await,
    }
}
