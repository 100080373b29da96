//! Role guards for gated operations.

use tracing::debug;

use crate::error::AuthError;
use crate::session::SessionStore;
use crate::traits::{Navigator, Route};
use crate::types::Role;
use crate::Result;

/// Allow only authenticated users; others are sent to the login entry point.
pub fn require_authenticated(store: &SessionStore, navigator: &dyn Navigator) -> bool {
    if store.is_authenticated() {
        return true;
    }
    debug!("Guard rejected anonymous user");
    navigator.navigate(Route::Login);
    false
}

/// Allow only platform admins; others are sent to the dashboard.
pub fn require_admin(store: &SessionStore, navigator: &dyn Navigator) -> bool {
    if store.is_admin() {
        return true;
    }
    debug!("Guard rejected non-admin user");
    navigator.navigate(Route::Dashboard);
    false
}

/// Allow tenant admins and platform admins; others are sent to the dashboard.
pub fn require_tenant_admin(store: &SessionStore, navigator: &dyn Navigator) -> bool {
    if store.is_tenant_admin() {
        return true;
    }
    debug!("Guard rejected non-tenant-admin user");
    navigator.navigate(Route::Dashboard);
    false
}

/// Error-returning variant for code paths without a navigator.
pub fn ensure_role(store: &SessionStore, required: Role) -> Result<()> {
    let allowed = match required {
        Role::Admin => store.is_admin(),
        Role::TenantAdmin => store.is_tenant_admin(),
        Role::User => store.is_authenticated(),
    };

    if allowed {
        Ok(())
    } else if !store.is_authenticated() {
        Err(AuthError::NotAuthenticated.into())
    } else {
        Err(AuthError::InsufficientRole { required }.into())
    }
}
