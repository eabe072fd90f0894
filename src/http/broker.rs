//! HTTP broker
//!
//! Dispatches single GET/POST requests and normalizes their outcome:
//! - Canonical query strings and JSON bodies
//! - Optional auth hook applied to the built request
//! - TLS verification toggled per call, only for https URLs
//! - Status codes and transport failures translated into [`Error`]

use super::request::{prepare_body, prepare_params, PostData, QueryParams};
use crate::auth::SharedAuth;
use crate::error::{Error, ErrorKind, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::{Client, Request, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// User agent sent when the caller sets none
pub const DEFAULT_USER_AGENT: &str = concat!("forest/", env!("CARGO_PKG_VERSION"));

/// Per-call options shared by GET and POST
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Hook applied to the request right before dispatch
    pub auth: Option<SharedAuth>,
    /// Verify the server certificate on https URLs
    pub check_ca: bool,
    /// Override the default user agent
    pub user_agent: Option<String>,
}

impl RequestOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auth hook
    #[must_use]
    pub fn auth(mut self, auth: SharedAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set certificate verification
    #[must_use]
    pub fn check_ca(mut self, check_ca: bool) -> Self {
        self.check_ca = check_ca;
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// The user agent actually sent
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl std::fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOptions")
            .field("has_auth", &self.auth.is_some())
            .field("check_ca", &self.check_ca)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// The seam the connector dispatches requests through
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the decoded JSON body
    async fn get(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        options: &RequestOptions,
    ) -> Result<Value>;

    /// POST `data` to `url` and return the created resource's location
    async fn post(&self, url: &str, data: &PostData, options: &RequestOptions) -> Result<String>;
}

/// Certificate verification setting for a URL.
///
/// `None` for plain http, where verification does not apply.
pub fn tls_verification(url: &str, check_ca: bool) -> Option<bool> {
    url.starts_with("https://").then_some(check_ca)
}

/// Fail with the error matching a classified status, succeed otherwise
pub fn check_http_status(status: u16, body: &str) -> Result<()> {
    debug!(status, "Response status code");
    match Error::from_status(status, body) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// `reqwest`-backed broker
#[derive(Debug, Clone)]
pub struct HttpBroker {
    verifying: Client,
    lenient: Client,
}

impl HttpBroker {
    /// Create a broker without a request timeout
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    /// Create a broker whose requests time out after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let client = |accept_invalid: bool| {
            let mut builder = Client::builder().danger_accept_invalid_certs(accept_invalid);
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            builder.build().map_err(|e| Error::from_transport(&e))
        };

        Ok(Self {
            verifying: client(false)?,
            lenient: client(true)?,
        })
    }

    fn client_for(&self, url: &str, check_ca: bool) -> &Client {
        match tls_verification(url, check_ca) {
            Some(false) => &self.lenient,
            _ => &self.verifying,
        }
    }

    async fn dispatch(
        &self,
        client: &Client,
        request: Request,
        options: &RequestOptions,
    ) -> Result<Response> {
        let request = match &options.auth {
            Some(hook) => hook.authenticate(request)?,
            None => request,
        };

        let response = client
            .execute(request)
            .await
            .map_err(|e| Error::from_transport(&e))?;

        let status = response.status().as_u16();
        if ErrorKind::from_status(status).is_none() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::from_status(status, body).unwrap_or(Error::Api { status }))
    }
}

#[async_trait]
impl Transport for HttpBroker {
    async fn get(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        options: &RequestOptions,
    ) -> Result<Value> {
        let client = self.client_for(url, options.check_ca);
        let pairs = prepare_params(params);

        debug!(
            url,
            params = ?pairs,
            user_agent = options.effective_user_agent(),
            verify = ?tls_verification(url, options.check_ca),
            "Sending a GET request"
        );

        let mut builder = client
            .get(url)
            .header(USER_AGENT, options.effective_user_agent());
        if let Some(pairs) = &pairs {
            builder = builder.query(pairs);
        }
        let request = builder.build().map_err(|e| Error::from_transport(&e))?;

        let response = self.dispatch(client, request, options).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::from_transport(&e))
    }

    async fn post(&self, url: &str, data: &PostData, options: &RequestOptions) -> Result<String> {
        let client = self.client_for(url, options.check_ca);
        let body = prepare_body(data)?;

        debug!(
            url,
            bytes = body.len(),
            user_agent = options.effective_user_agent(),
            verify = ?tls_verification(url, options.check_ca),
            "Sending a POST request"
        );

        let request = client
            .post(url)
            .header(USER_AGENT, options.effective_user_agent())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| Error::from_transport(&e))?;

        let response = self.dispatch(client, request, options).await?;
        if response.status() != StatusCode::CREATED {
            return Err(Error::Api {
                status: response.status().as_u16(),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::MissingHeader {
                header: LOCATION.to_string(),
            })?
            .to_string();

        info!(location = %location, "Newly created resource");
        Ok(location)
    }
}
