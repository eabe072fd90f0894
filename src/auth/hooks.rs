//! Auth hook implementations
//!
//! Applies credentials to outgoing requests.

use crate::error::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Capability that attaches credentials to an outgoing request
///
/// Implementations receive the fully built request, may read or rewrite its
/// headers, and hand it back. Any `Fn(Request) -> Result<Request>` closure is
/// an auth hook as well.
pub trait AuthHook: Send + Sync {
    /// Mutate and return the request
    fn authenticate(&self, request: Request) -> Result<Request>;
}

impl<F> AuthHook for F
where
    F: Fn(Request) -> Result<Request> + Send + Sync,
{
    fn authenticate(&self, request: Request) -> Result<Request> {
        self(request)
    }
}

/// Auth hook shared between a connector and the requests it dispatches
pub type SharedAuth = Arc<dyn AuthHook>;

fn sensitive_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_value("auth", format!("invalid header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

// ============================================================================
// Tastypie API Key
// ============================================================================

/// Tastypie's ApiKey authentication
///
/// Sets `Authorization: " ApiKey <username>:<api_key>"`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyAuth {
    /// Account name the key belongs to
    pub username: String,
    /// The API key
    pub api_key: String,
}

impl ApiKeyAuth {
    /// Create a new API key hook
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Value placed in the `Authorization` header
    pub fn header_value(&self) -> String {
        format!(" ApiKey {}:{}", self.username, self.api_key)
    }
}

impl AuthHook for ApiKeyAuth {
    fn authenticate(&self, mut request: Request) -> Result<Request> {
        let value = sensitive_value(&self.header_value())?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(request)
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bearer Token
// ============================================================================

/// Bearer token authentication
#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth {
    /// The bearer token
    pub token: String,
}

impl BearerAuth {
    /// Create a new bearer hook
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AuthHook for BearerAuth {
    fn authenticate(&self, mut request: Request) -> Result<Request> {
        let value = sensitive_value(&format!("Bearer {}", self.token))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(request)
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth").finish_non_exhaustive()
    }
}

// ============================================================================
// Custom Headers
// ============================================================================

/// Fixed set of headers added to each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderAuth {
    /// Headers to add, replacing any existing value
    pub headers: BTreeMap<String, String>,
}

impl HeaderAuth {
    /// Create an empty header hook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl AuthHook for HeaderAuth {
    fn authenticate(&self, mut request: Request) -> Result<Request> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::invalid_value("auth", format!("invalid header name: {e}")))?;
            request.headers_mut().insert(name, sensitive_value(value)?);
        }
        Ok(request)
    }
}
