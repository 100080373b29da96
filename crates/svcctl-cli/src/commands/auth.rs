//! login, logout, register, whoami and refresh.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use svcctl_core::expiry;
use svcctl_core::models::RegisterRequest;
use svcctl_core::{Credentials, User};

use crate::output;
use crate::session::Console;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "SVCCTL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "SVCCTL_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,
}

pub async fn login(args: LoginArgs, console: &Console) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let response = match console.client().auth().login(&credentials).await {
        Ok(response) => response,
        Err(err) if err.is_auth_loss() => {
            bail!("Login failed. Please check your credentials.")
        }
        Err(err) => return Err(err).context("Login failed"),
    };

    output::success("Logged in successfully");
    println!();
    print_identity(&response.user);
    Ok(())
}

pub fn logout(console: &Console) -> Result<()> {
    console
        .client()
        .auth()
        .logout()
        .context("Failed to remove stored session")?;
    output::success("Logged out");
    Ok(())
}

pub async fn register(args: RegisterArgs, console: &Console) -> Result<()> {
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
    };

    let response = console.client().auth().register(&request).await?;

    output::success(&response.message);
    println!();
    print_identity(&response.user);
    Ok(())
}

pub fn whoami(console: &Console) -> Result<()> {
    let store = console.store();
    let user = store
        .identity()
        .context("No active session. Run `svcctl login` first.")?;

    print_identity(&user);
    if let Some(token) = store.access_token() {
        match expiry::expires_at(&token) {
            Some(at) if expiry::is_expired(&token) => {
                output::field("Token", &format!("expired at {}", at.to_rfc3339()))
            }
            Some(at) => output::field("Token", &format!("valid until {}", at.to_rfc3339())),
            None => output::field("Token", "expiry unknown"),
        }
    }
    Ok(())
}

pub async fn refresh(console: &Console) -> Result<()> {
    let response = console
        .client()
        .auth()
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed");
    if let Some(at) = response.expires_at {
        output::field("Expires", &at.to_rfc3339());
    }
    Ok(())
}

pub(crate) fn print_identity(user: &User) {
    output::field("User", &user.username);
    output::field("Name", &user.display_name());
    output::field("Email", &user.email);
    output::field("Role", user.role.as_str());
    if let Some(ref tenant) = user.tenant_id {
        output::field("Tenant", tenant);
    }
}
