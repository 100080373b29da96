use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, InvalidInputError};

const LOOPBACK: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Base URL of the console API, e.g. `https://ops.example.com/api/v1`.
///
/// Absolute, no query or fragment, and HTTPS unless the host is a loopback
/// address (bearer tokens ride on every call). Stored without a trailing
/// slash so endpoint paths append cleanly.
///
/// ```
/// use svcctl_core::ApiUrl;
///
/// let api = ApiUrl::new("http://localhost:8080/api/v1/").unwrap();
/// assert_eq!(api.endpoint("/auth/login"), "http://localhost:8080/api/v1/auth/login");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiUrl(Url);

impl ApiUrl {
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref(), false)
    }

    /// Like [`new`](Self::new) but accepts plain HTTP on any host, for
    /// deployments reachable only over an internal network.
    pub fn new_insecure(s: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse(s.as_ref(), true)
    }

    /// True when calls to this URL travel unencrypted.
    pub fn is_plaintext(&self) -> bool {
        self.0.scheme() == "http"
    }

    fn parse(raw: &str, allow_http: bool) -> Result<Self, Error> {
        let reject = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: raw.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let mut url = Url::parse(raw).map_err(|e| reject(&e.to_string()))?;

        let Some(host) = url.host_str() else {
            return Err(reject("must be an absolute URL with a host"));
        };
        match url.scheme() {
            "https" => {}
            "http" if allow_http || LOOPBACK.contains(&host) => {}
            _ => return Err(reject("must use HTTPS (HTTP allowed only for localhost)")),
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(reject("must not carry a query or fragment"));
        }

        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        Ok(Self(url))
    }

    /// Absolute URL of `path`, with or without its leading slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.0.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ApiUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ApiUrl> for String {
    fn from(url: ApiUrl) -> Self {
        url.0.into()
    }
}
