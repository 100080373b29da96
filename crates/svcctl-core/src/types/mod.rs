//! Validated types shared across the console.

mod api_url;
mod user;

pub use api_url::ApiUrl;
pub use user::{Role, User};
