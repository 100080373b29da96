//! Session state and its rehydration from durable storage.

mod bootstrap;
mod store;

pub use bootstrap::{Bootstrap, bootstrap};
pub use store::{ActiveSession, SessionSignal, SessionState, SessionStore};
