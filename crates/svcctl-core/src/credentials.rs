use std::fmt;

use serde::Serialize;

use crate::Result;
use crate::error::InvalidInputError;

/// The body of `POST /auth/login`.
///
/// ```
/// use svcctl_core::Credentials;
///
/// let creds = Credentials::new("alice", "hunter22");
/// assert!(creds.validate().is_ok());
/// assert!(!format!("{:?}", creds).contains("hunter22"));
/// ```
#[derive(Clone, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Both fields must be filled in before anything is sent.
    pub fn validate(&self) -> Result<()> {
        let missing = match (self.username.trim().is_empty(), self.password.is_empty()) {
            (true, true) => "username and password are required",
            (true, false) => "username is required",
            (false, true) => "password is required",
            (false, false) => return Ok(()),
        };
        Err(InvalidInputError::Other {
            message: missing.to_string(),
        }
        .into())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credentials({} / ***)", self.username)
    }
}
