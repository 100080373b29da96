//! Durable session storage trait.

use crate::Result;
use crate::storage::StoredSession;

/// Durable client-side storage for the session record.
///
/// Implementations persist the whole [`StoredSession`] as one unit: `save`
/// either replaces every entry or none of them.
pub trait SessionStorage: Send + Sync {
    /// Load the stored record. A missing record loads as empty.
    fn load(&self) -> Result<StoredSession>;

    /// Replace the stored record.
    fn save(&self, record: &StoredSession) -> Result<()>;

    /// Remove the stored record. Removing an absent record succeeds.
    fn clear(&self) -> Result<()>;
}
