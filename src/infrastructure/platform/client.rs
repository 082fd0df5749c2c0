use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::models::{
    AgentListPage, AgentPatch, AgentRecord, ApiConfig, CreateAgentRequest, CreateAgentResponse,
    MutationConfirmation,
};
use crate::domain::ports::AgentApi;
use crate::infrastructure::logging::{redact_token, scrub_secrets};

/// Configuration for the calling platform HTTP client
#[derive(Debug, Clone)]
pub struct PlatformClientConfig {
    /// Base URL, e.g. `https://api.verbex.ai`
    pub base_url: String,

    /// Bearer token for every request
    pub token: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl From<&ApiConfig> for PlatformClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            token: api.token.clone(),
            timeout_secs: api.timeout_secs,
        }
    }
}

/// reqwest-backed [`AgentApi`] for the calling platform's `/v2/ai-agents` resource.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http_client: ReqwestClient,
    base_url: Url,
}

impl PlatformClient {
    pub fn new(config: PlatformClientConfig) -> Result<Self> {
        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            token = %redact_token(&config.token),
            "initializing platform client"
        );

        let mut bearer = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("API token contains characters not allowed in a header")?;
        bearer.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid platform base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid platform base URL: {}", config.base_url);
        }

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// `{base}/v2/ai-agents` followed by `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["v2", "ai-agents"])
                .extend(segments);
        }
        url
    }

    fn agents_url(&self) -> Url {
        self.endpoint(&[])
    }

    fn agent_url(&self, agent_id: &str) -> Url {
        self.endpoint(&[agent_id])
    }

    /// Send and turn any non-2xx answer into [`ApiError::Rejected`].
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(%status, "platform response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, body = %scrub_secrets(&body), "platform rejected request");
        Err(rejection(status.as_u16(), &body))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err.to_string())
    }
}

/// Normalize an error body.
///
/// JSON bodies contribute `message` (or `error`) and `details`; anything else
/// is kept as the message verbatim.
fn rejection(status: u16, body: &str) -> ApiError {
    let text = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let (message, details) = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => (
            fields.get("message").or_else(|| fields.get("error")).map(text),
            fields.get("details").map(text),
        ),
        _ => {
            let trimmed = body.trim();
            ((!trimmed.is_empty()).then(|| trimmed.to_string()), None)
        }
    };

    ApiError::Rejected {
        status,
        message,
        details,
    }
}

#[async_trait]
impl AgentApi for PlatformClient {
    #[instrument(skip(self))]
    async fn list_agents(&self, page_token: Option<&str>) -> ApiResult<AgentListPage> {
        let mut request = self.http_client.get(self.endpoint(&[""]));
        if let Some(token) = page_token {
            request = request.query(&[("page_token", token)]);
        }
        decode(self.execute(request).await?).await
    }

    #[instrument(skip(self))]
    async fn get_agent(&self, agent_id: &str) -> ApiResult<AgentRecord> {
        let request = self.http_client.get(self.agent_url(agent_id));
        decode(self.execute(request).await?).await
    }

    #[instrument(skip(self, request), fields(agent_name = %request.agent_name))]
    async fn create_agent(&self, request: &CreateAgentRequest) -> ApiResult<CreateAgentResponse> {
        let builder = self.http_client.post(self.agents_url()).json(request);
        decode(self.execute(builder).await?).await
    }

    #[instrument(skip(self, patch))]
    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> ApiResult<MutationConfirmation> {
        let request = self.http_client.patch(self.agent_url(agent_id)).json(patch);
        decode(self.execute(request).await?).await
    }

    #[instrument(skip(self))]
    async fn delete_agent(&self, agent_id: &str) -> ApiResult<MutationConfirmation> {
        let request = self.http_client.delete(self.agent_url(agent_id));
        let bytes = self
            .execute(request)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;

        // The platform may answer a delete with no body at all.
        Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_| MutationConfirmation::deleted(agent_id)))
    }
}
