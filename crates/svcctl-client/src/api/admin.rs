//! User administration. Every call checks the admin role locally first.

use tracing::instrument;

use svcctl_core::guard::ensure_role;
use svcctl_core::models::{MessageResponse, UpdateRoleRequest, UserListResponse};
use svcctl_core::{Result, Role};

use crate::client::ApiClient;
use crate::request::ApiRequest;

pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    fn authorize(&self) -> Result<()> {
        ensure_role(self.client.store(), Role::Admin)
    }

    pub async fn users(&self, limit: u32, offset: u32) -> Result<UserListResponse> {
        self.authorize()?;
        let request = ApiRequest::get("/admin/users").query([
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ]);
        self.client.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<MessageResponse> {
        self.authorize()?;
        let request = ApiRequest::put(format!("/admin/users/{}/role", user_id))
            .json(&UpdateRoleRequest { role })?;
        self.client.fetch(request).await
    }

    #[instrument(skip(self))]
    pub async fn activate(&self, user_id: &str) -> Result<MessageResponse> {
        self.authorize()?;
        self.client
            .fetch(ApiRequest::put(format!("/admin/users/{}/activate", user_id)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, user_id: &str) -> Result<MessageResponse> {
        self.authorize()?;
        self.client
            .fetch(ApiRequest::put(format!("/admin/users/{}/deactivate", user_id)))
            .await
    }
}
