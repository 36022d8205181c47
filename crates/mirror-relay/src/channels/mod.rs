//! Channel-creation REST call
//!
//! Creates a channel resource on the remote platform. Used by operators
//! setting up mirror destinations, not by the runtime mirror path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default REST API base
const API_BASE_URL: &str = "https://discord.com/api/v10";

/// Channel-creation errors
#[derive(Debug, Error)]
pub enum ChannelApiError {
    /// The request could not be sent
    #[error("Channel request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API rejected the request
    #[error("Channel creation rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Body of a channel-creation call
#[derive(Debug, Clone, Serialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub parent_id: Option<String>,
    pub position: i32,
}

/// Created channel resource, as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResource {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

/// REST client for channel management
#[derive(Debug, Clone)]
pub struct ChannelApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ChannelApi {
    /// Create a client against the default API base
    #[must_use]
    pub fn new(http: reqwest::Client, token: Option<String>) -> Self {
        Self::with_base_url(http, token, API_BASE_URL)
    }

    /// Create a client against a custom API base
    #[must_use]
    pub fn with_base_url(
        http: reqwest::Client,
        token: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token,
        }
    }

    /// Create a channel in a guild
    ///
    /// The `Authorization` header is attached only when a token is
    /// configured.
    ///
    /// # Errors
    /// Returns an error if the request fails or the API responds with a
    /// non-success status
    pub async fn create_channel(
        &self,
        guild_id: &str,
        request: &CreateChannelRequest,
    ) -> Result<ChannelResource, ChannelApiError> {
        let url = format!("{}/guilds/{guild_id}/channels", self.base_url);

        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelApiError::Rejected(status));
        }

        Ok(response.json().await?)
    }
}
