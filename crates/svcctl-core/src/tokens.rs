//! Opaque session tokens.
//!
//! Both tokens are plain strings to everything except [`crate::expiry`],
//! which peeks at the access token's `exp` claim. Neither prints its value
//! through `Debug`, so a session can be logged with `?session` safely.

use std::fmt;

macro_rules! secret_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(token: impl Into<String>) -> Self {
                Self(token.into())
            }

            /// The raw value, for the wire and the session record only.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(token: String) -> Self {
                Self(token)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(***, {} bytes)"), self.0.len())
            }
        }
    };
}

secret_token! {
    /// Short-lived JWT sent as `Authorization: Bearer` on every call.
    AccessToken
}

secret_token! {
    /// Long-lived token traded at `/auth/refresh` for a new pair.
    RefreshToken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_length_not_value() {
        let access = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.e30.sig");
        assert_eq!(format!("{:?}", access), "AccessToken(***, 28 bytes)");

        let refresh = RefreshToken::from("r-42".to_string());
        let debug = format!("{:?}", refresh);
        assert!(!debug.contains("r-42"));
        assert!(debug.starts_with("RefreshToken("));
    }

    #[test]
    fn raw_value_is_still_reachable() {
        let token = AccessToken::new("abc");
        assert_eq!(token.as_str(), "abc");
        assert!(!token.is_empty());
        assert!(RefreshToken::new("").is_empty());
    }
}
