//! The signed-in user's own profile.

use tracing::instrument;

use svcctl_core::models::ProfileUpdate;
use svcctl_core::{Result, User};

use crate::client::ApiClient;
use crate::request::ApiRequest;

pub struct ProfileApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfileApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<User> {
        self.client.fetch(ApiRequest::get("/users/me")).await
    }

    /// Update the profile and the identity held by the session.
    #[instrument(skip_all)]
    pub async fn update(&self, update: &ProfileUpdate) -> Result<User> {
        let user: User = self
            .client
            .fetch(ApiRequest::put("/users/me").json(update)?)
            .await?;
        self.client.store().update_identity(user.clone())?;
        Ok(user)
    }
}
