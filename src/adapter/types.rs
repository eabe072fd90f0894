//! Adapter types and traits
//!
//! Defines the extraction hooks every API flavor implements.

use crate::error::{Error, Result};
use crate::http::QueryParams;
use serde_json::Value;
use url::Url;

/// Where the next page lives: a resource path relative to the API root
/// plus its query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumptionToken {
    /// Resource path, e.g. `journals`
    pub resource: String,
    /// Query parameters for the next request
    pub params: QueryParams,
}

impl ResumptionToken {
    /// Create a new token
    pub fn new(resource: impl Into<String>, params: QueryParams) -> Self {
        Self {
            resource: resource.into(),
            params,
        }
    }
}

/// Extraction hooks for one API flavor
pub trait Adapter: Send + Sync {
    /// Documents contained in one page, in server order
    fn extract_documents(&self, payload: &Value) -> Result<Vec<Value>>;

    /// The next page, or `None` when the server says there is none.
    ///
    /// `Ok(None)` ends iteration normally; `Err` means the payload could not
    /// be interpreted at all.
    fn extract_continuation(&self, payload: &Value) -> Result<Option<ResumptionToken>>;

    /// Query key carrying the page size, if the flavor has one
    fn page_size_param(&self) -> Option<&str> {
        None
    }
}

/// Parse a next-page URI such as `/api/v1/journals/?limit=1&offset=1`.
///
/// The resource is the last non-empty path segment and every query value
/// becomes a list, so repeated keys survive.
pub fn parse_next_uri(uri: &str) -> Result<ResumptionToken> {
    let base = Url::parse("http://localhost/")?;
    let parsed = base.join(uri)?;

    let resource = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| Error::extraction("next", format!("no resource path in '{uri}'")))?
        .to_string();

    let mut params = QueryParams::new();
    for (key, value) in parsed.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params.append(key.into_owned(), vec![value.into_owned()]);
    }

    Ok(ResumptionToken::new(resource, params))
}
