//! HTTP access to the discovery/action service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::ActionKind,
    error::error_text_from_body,
    protocol::{
        AttendeeDiscoveryRequest, AttendeeDiscoveryResponse, AuthStatusResponse,
        EventDiscoveryRequest, EventDiscoveryResponse, HealthResponse, SocialActionRequest,
        SocialActionResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:10000/api";
/// Action endpoints pace themselves per attendee, so a batch can take minutes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Seam between the core and the remote service. Implementations only move
/// bodies over the wire; `success: false` handling belongs to the callers.
#[async_trait]
pub trait EventApi: Send + Sync {
    async fn discover_events(
        &self,
        request: &EventDiscoveryRequest,
    ) -> Result<EventDiscoveryResponse>;
    async fn discover_attendees(
        &self,
        request: &AttendeeDiscoveryRequest,
    ) -> Result<AttendeeDiscoveryResponse>;
    async fn perform_action(
        &self,
        action: ActionKind,
        request: &SocialActionRequest,
    ) -> Result<SocialActionResponse>;
    async fn health(&self) -> Result<HealthResponse>;
    async fn auth_status(&self) -> Result<AuthStatusResponse>;
}

pub struct HttpEventApi {
    http: Client,
    base_url: String,
}

impl HttpEventApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| {
            ClientError::validation(format!("invalid API base URL '{base_url}': {err}"))
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        decode_response(response).await
    }

    async fn get_json<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let mut message = error_text_from_body(&body);
        if message.is_empty() {
            message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
        }
        return Err(ClientError::Transport {
            status: Some(status.as_u16()),
            message,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[async_trait]
impl EventApi for HttpEventApi {
    async fn discover_events(
        &self,
        request: &EventDiscoveryRequest,
    ) -> Result<EventDiscoveryResponse> {
        self.post_json("discover-events", request).await
    }

    async fn discover_attendees(
        &self,
        request: &AttendeeDiscoveryRequest,
    ) -> Result<AttendeeDiscoveryResponse> {
        self.post_json("discover-attendees", request).await
    }

    async fn perform_action(
        &self,
        action: ActionKind,
        request: &SocialActionRequest,
    ) -> Result<SocialActionResponse> {
        self.post_json(action.operation(), request).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.get_json("health").await
    }

    async fn auth_status(&self) -> Result<AuthStatusResponse> {
        self.get_json("auth-status").await
    }
}
