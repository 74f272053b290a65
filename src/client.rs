//! Blocking HTTP client for the API.
//!
//! Requests and responses are JSON. Failed requests come back as
//! [`ClientError`] exactly as the server or transport reported them; nothing
//! is retried.

use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::defs::DefsClient;
use crate::error::ClientError;
use crate::orgs::OrgsClient;
use crate::people::PeopleClient;
use crate::repo_status::RepoStatusClient;
use crate::repos::RepositoriesClient;
use crate::router::{Route, RouteVars, Router};

/// API client. Service handles borrow it: `client.people().get(..)`.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    router: Router,
    token: Option<String>,
}

impl Client {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the underlying HTTP client cannot be
    /// constructed (e.g. TLS backend initialisation fails).
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|source| ClientError::Network {
                url: config.base_url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            router: Router::new(config.base_url),
            token: config.token,
        })
    }

    /// Build a client from `CODEGRAPH_URL` / `CODEGRAPH_TOKEN`.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn people(&self) -> PeopleClient<'_> {
        PeopleClient::new(self)
    }

    pub fn repos(&self) -> RepositoriesClient<'_> {
        RepositoriesClient::new(self)
    }

    pub fn defs(&self) -> DefsClient<'_> {
        DefsClient::new(self)
    }

    pub fn orgs(&self) -> OrgsClient<'_> {
        OrgsClient::new(self)
    }

    pub fn repo_status(&self) -> RepoStatusClient<'_> {
        RepoStatusClient::new(self)
    }

    /// Build the URL for `route` with `opts` as its query string.
    pub fn url<O>(
        &self,
        route: Route,
        route_vars: &RouteVars,
        opts: Option<&O>,
    ) -> Result<Url, ClientError>
    where
        O: Serialize + ?Sized,
    {
        self.router.url(route, route_vars, opts)
    }

    /// Send a request and decode the JSON response body into `T`.
    pub fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, &url, body)?;
        let bytes = response.bytes().map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }

    /// Send a request whose response body carries nothing of interest.
    pub fn send_empty<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, &url, body).map(drop)
    }

    /// Resolve `route`, GET it and decode the response.
    pub(crate) fn get<T, O>(
        &self,
        route: Route,
        route_vars: &RouteVars,
        opts: Option<&O>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        O: Serialize + ?Sized,
    {
        let url = self.url(route, route_vars, opts)?;
        self.send(Method::GET, url, None::<&()>)
    }

    fn execute<B>(&self, method: Method, url: &Url, body: Option<&B>) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, %url, "sending request");

        let mut request: RequestBuilder = self.http.request(method.clone(), url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|source| {
            tracing::warn!(%method, %url, error = %source, "request failed");
            ClientError::Network {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "received response");
        if status.is_success() {
            return Ok(response);
        }

        // The server explains failures in the body; keep it for the caller.
        let message = response
            .text()
            .ok()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
        tracing::debug!(%method, %url, status = status.as_u16(), %message, "request rejected");
        Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
