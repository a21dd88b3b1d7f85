use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;

use crate::errors::Result;

/// Configuration for the HTTP client talking to the trading engine.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host (default: 4)
    pub pool_max_idle_per_host: usize,

    /// Idle timeout for connections (default: 90s)
    pub pool_idle_timeout: Duration,

    /// Connection establishment timeout (default: 5s)
    pub connect_timeout: Duration,

    /// Total request timeout (default: 10s)
    pub request_timeout: Duration,

    /// TCP keepalive interval (default: 60s)
    pub tcp_keepalive: Duration,

    /// Enable TCP_NODELAY (default: true)
    pub tcp_nodelay: bool,

    /// Enable Hickory DNS for async resolution (default: true)
    pub hickory_dns: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 4,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
            hickory_dns: true,
            user_agent: concat!("aiotrade-controller/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Shorter timeouts for an engine on the same host or container network.
    pub fn local() -> Self {
        Self { connect_timeout: Duration::from_secs(2), request_timeout: Duration::from_secs(5), ..Default::default() }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            // Connection pooling
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            // TCP
            .tcp_nodelay(config.tcp_nodelay)
            .tcp_keepalive(Some(config.tcp_keepalive))
            // Timeouts
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            // TLS with rustls, for engines behind a reverse proxy
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .user_agent(config.user_agent.clone())
            .gzip(true);

        if config.hickory_dns {
            builder = builder.hickory_dns(true);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a GET request builder
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    /// Create a POST request builder
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }
}
