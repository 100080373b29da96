//! svcctl-store - Durable session storage on the local filesystem.
//!
//! [`FileStorage`] keeps the session record as a single JSON document and
//! replaces it atomically, so a crash mid-write never leaves a record with
//! a token but no identity.

mod file;

pub use file::FileStorage;
