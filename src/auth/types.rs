//! Auth configuration types
//!
//! The serializable form of an auth hook, as it appears in a connector
//! settings file.

use super::hooks::{ApiKeyAuth, BearerAuth, HeaderAuth, SharedAuth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// Tastypie API key
    ApiKey {
        /// Account name
        username: String,
        /// The API key
        api_key: String,
    },

    /// Bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Custom headers
    Headers {
        /// Headers to add to each request
        headers: BTreeMap<String, String>,
    },
}

impl AuthConfig {
    /// Build the hook described by this config
    pub fn into_hook(self) -> SharedAuth {
        match self {
            Self::ApiKey { username, api_key } => Arc::new(ApiKeyAuth::new(username, api_key)),
            Self::Bearer { token } => Arc::new(BearerAuth::new(token)),
            Self::Headers { headers } => Arc::new(HeaderAuth { headers }),
        }
    }
}
