//! Login, registration and the token refresh flow.

use tracing::{info, instrument, warn};

use svcctl_core::error::AuthError;
use svcctl_core::expiry;
use svcctl_core::models::{LoginResponse, RefreshRequest, RegisterRequest, RegisterResponse};
use svcctl_core::{AccessToken, Credentials, RefreshToken, Result, Route};

use crate::client::ApiClient;
use crate::request::ApiRequest;

/// Outcome of [`AuthApi::check_and_maybe_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCheck {
    /// Nobody is logged in.
    NoSession,
    /// The access token has not expired.
    Fresh,
    /// The token had expired and was refreshed.
    Refreshed,
    /// The token had expired, refreshing failed and the session is gone.
    LoggedOut,
}

/// `/auth` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and establish the session.
    #[instrument(skip_all, fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        credentials.validate()?;
        let request = ApiRequest::post("/auth/login").json(credentials)?;
        let response: LoginResponse = self.client.fetch(request).await?;
        self.establish(&response)?;
        info!(user = %response.user.username, "Logged in");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.client
            .fetch(ApiRequest::post("/auth/register").json(request)?)
            .await
    }

    /// Exchange the stored refresh token for a new session.
    ///
    /// Without a refresh token this fails at once and sends nothing. On any
    /// other failure the session is cleared and the error returned. On
    /// success the new session is in the store before this returns.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<LoginResponse> {
        let store = self.client.store();
        let Some(refresh_token) = store.refresh_token() else {
            return Err(AuthError::NoRefreshToken.into());
        };

        let result = self.exchange(&refresh_token).await;
        if let Err(ref error) = result {
            warn!(%error, "Token refresh failed, clearing session");
            let _ = store.clear_session();
        }
        result
    }

    async fn exchange(&self, refresh_token: &RefreshToken) -> Result<LoginResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.as_str(),
        };
        let response: LoginResponse = self
            .client
            .fetch(ApiRequest::post("/auth/refresh").json(&body)?)
            .await?;
        self.establish(&response)?;
        info!("Session refreshed");
        Ok(response)
    }

    /// Drop the session locally.
    pub fn logout(&self) -> Result<()> {
        self.client.store().clear_session()
    }

    /// Refresh the session if its access token has expired.
    ///
    /// A failed refresh ends the session and sends the user to the login
    /// entry point once; the error itself is not returned.
    pub async fn check_and_maybe_refresh(&self) -> RefreshCheck {
        let Some(token) = self.client.store().access_token() else {
            return RefreshCheck::NoSession;
        };
        if !expiry::is_expired(&token) {
            return RefreshCheck::Fresh;
        }

        match self.refresh().await {
            Ok(_) => RefreshCheck::Refreshed,
            Err(error) => {
                let _ = self.client.store().clear_session();
                // A 401 was already routed to login by the interceptor.
                if !error.is_auth_loss() {
                    self.client.navigator().navigate(Route::Login);
                }
                RefreshCheck::LoggedOut
            }
        }
    }

    fn establish(&self, response: &LoginResponse) -> Result<()> {
        self.client.store().set_session(
            response.user.clone(),
            AccessToken::new(response.token.clone()),
            RefreshToken::new(response.refresh_token.clone()),
        )
    }
}
