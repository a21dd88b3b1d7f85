use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::errors::ApiError;
use crate::errors::Result;
use crate::models::Balance;
use crate::models::CommandAck;
use crate::models::DailyProfit;
use crate::models::OpenTrade;
use crate::models::ShowConfig;
use crate::reload::RetryPolicy;

pub const API_PREFIX: &str = "/api/v1";

/// Longest slice of an error body kept for logs and errors
const ERROR_BODY_LIMIT: usize = 200;

/// HTTP Basic credentials of the engine API
#[derive(Clone)]
pub struct ApiCredentials {
    pub username: String,
    pub password: String,
}

impl ApiCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials").field("username", &self.username).field("password", &"***").finish()
    }
}

/// REST client for the trading engine API
#[derive(Debug, Clone)]
pub struct FreqtradeClient {
    client: HttpClient,
    base_url: String,
    credentials: ApiCredentials,
    retry: RetryPolicy,
}

impl FreqtradeClient {
    /// Create a client with default HTTP and retry configuration
    pub fn new(base_url: &str, credentials: ApiCredentials) -> Result<Self> {
        Self::builder(base_url, credentials).build()
    }

    pub fn builder(base_url: &str, credentials: ApiCredentials) -> FreqtradeClientBuilder {
        FreqtradeClientBuilder::new(base_url, credentials)
    }

    /// Engine root URL, without the API prefix
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Engine state and strategy (`GET /show_config`)
    pub async fn show_config(&self) -> Result<ShowConfig> {
        self.get_json("show_config").await
    }

    /// Wallet balance (`GET /balance`)
    pub async fn balance(&self) -> Result<Balance> {
        self.get_json("balance").await
    }

    /// Daily profit statistics (`GET /daily`)
    pub async fn daily(&self) -> Result<DailyProfit> {
        self.get_json("daily").await
    }

    /// Currently open trades (`GET /status`)
    pub async fn open_trades(&self) -> Result<Vec<OpenTrade>> {
        self.get_json("status").await
    }

    /// Start trading (`POST /start`)
    pub async fn start(&self) -> Result<CommandAck> {
        self.post_command("start").await
    }

    /// Stop trading (`POST /stop`)
    pub async fn stop(&self) -> Result<CommandAck> {
        self.post_command("stop").await
    }

    /// Single reload attempt (`POST /reload_config`)
    ///
    /// See [`crate::ReloadNotifier`] for the retried variant.
    pub async fn reload_config(&self) -> Result<CommandAck> {
        self.post_command("reload_config").await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self
            .client
            .get(&self.url(endpoint))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|err| self.request_error(err))?;

        let response = check_status(endpoint, response).await?;
        let bytes = response.bytes().await.map_err(|err| self.request_error(err))?;

        let parsed = serde_json::from_slice(&bytes).map_err(|err| {
            warn!(endpoint, error = %err, "Malformed API response");
            err
        })?;
        debug!(endpoint, "API request succeeded");
        Ok(parsed)
    }

    async fn post_command(&self, endpoint: &str) -> Result<CommandAck> {
        let response = self
            .client
            .post(&self.url(endpoint))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|err| self.request_error(err))?;

        let response = check_status(endpoint, response).await?;
        let bytes = response.bytes().await.map_err(|err| self.request_error(err))?;

        let ack: CommandAck = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::InvalidResponse(format!("{endpoint} did not acknowledge: {}", truncate(&String::from_utf8_lossy(&bytes)))))?;

        info!(endpoint, status = %ack.status, "API command succeeded");
        Ok(ack)
    }

    fn request_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            error!(error = %err, "API request timed out");
            return ApiError::Timeout(self.client.config().request_timeout);
        }
        error!(error = %err, "Network error calling engine API");
        err.into()
    }
}

async fn check_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        error!(endpoint, "Auth failed: invalid credentials");
        return Err(ApiError::Unauthorized { endpoint: endpoint.to_string() });
    }

    let body = truncate(&response.text().await.unwrap_or_default());
    warn!(endpoint, status = status.as_u16(), body = %body, "API returned an error status");
    Err(ApiError::Status { endpoint: endpoint.to_string(), status: status.as_u16(), body })
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

/// Builder for configuring the engine client
pub struct FreqtradeClientBuilder {
    http_config: HttpClientConfig,
    base_url: String,
    credentials: ApiCredentials,
    retry: RetryPolicy,
}

impl FreqtradeClientBuilder {
    pub fn new(base_url: &str, credentials: ApiCredentials) -> Self {
        Self { http_config: HttpClientConfig::default(), base_url: normalize_base_url(base_url), credentials, retry: RetryPolicy::default() }
    }

    /// Configure HTTP client settings
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure reload retries
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<FreqtradeClient> {
        let client = HttpClient::with_config(self.http_config)?;
        Ok(FreqtradeClient { client, base_url: self.base_url, credentials: self.credentials, retry: self.retry })
    }
}

/// Accepts `http://core:8080`, `http://core:8080/` and `http://core:8080/api/v1`
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    trimmed.strip_suffix(API_PREFIX).unwrap_or(trimmed).to_string()
}
