//! Terminal output. Results go to stdout, everything addressed to the
//! person at the keyboard goes to stderr.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use svcctl_core::NotificationKind;
use svcctl_core::models::ServiceStatus;

fn marker(kind: NotificationKind) -> ColoredString {
    match kind {
        NotificationKind::Success => "✓".green(),
        NotificationKind::Error => "✗".red(),
        NotificationKind::Warning => "!".yellow(),
        NotificationKind::Info => "i".blue(),
    }
}

pub fn success(msg: &str) {
    println!("{} {}", marker(NotificationKind::Success), msg);
}

pub fn error(msg: &str) {
    notification(NotificationKind::Error, msg);
}

pub fn hint(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

pub fn notification(kind: NotificationKind, msg: &str) {
    eprintln!("{} {}", marker(kind), msg);
}

/// `label: value`, label dimmed.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

pub fn status(status: ServiceStatus) -> String {
    let text = status.as_str();
    let painted = match status {
        ServiceStatus::Running => text.green(),
        ServiceStatus::Stopped => text.dimmed(),
        ServiceStatus::Error => text.red(),
        ServiceStatus::Pending => text.yellow(),
        ServiceStatus::Unknown => text.normal(),
    };
    painted.to_string()
}

/// One line of JSON, for piping into `jq`.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
