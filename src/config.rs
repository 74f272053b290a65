//! Client configuration.

use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3080/api/";

/// Default timeout for HTTP requests (10 seconds).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the API base URL.
pub const ENV_URL: &str = "CODEGRAPH_URL";

/// Environment variable holding the access token.
pub const ENV_TOKEN: &str = "CODEGRAPH_TOKEN";

/// Connection settings for [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root. Route paths are appended to it.
    pub base_url: Url,
    /// Opaque access token sent as a bearer `Authorization` header.
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            token: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: HTTP_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a config for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Read `CODEGRAPH_URL` and `CODEGRAPH_TOKEN`, falling back to defaults
    /// for whatever is unset.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = match std::env::var(ENV_URL) {
            Ok(url) if !url.is_empty() => Self::new(&url)?,
            _ => Self::default(),
        };
        config.token = std::env::var(ENV_TOKEN).ok().filter(|t| !t.is_empty());
        Ok(config)
    }

    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Parse an API base URL, making sure its path ends with `/`.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw).map_err(|e| ClientError::Config {
        message: format!("invalid base URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config {
            message: format!("base URL '{raw}' must use http or https"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
