//! Tastypie flavor
//!
//! Tastypie lists look like:
//!
//! ```json
//! {
//!   "meta": {"limit": 1, "next": "/api/v1/journals/?limit=1&offset=1", "offset": 0},
//!   "objects": [{"title": "..."}]
//! }
//! ```

use super::types::{parse_next_uri, Adapter, ResumptionToken};
use crate::error::{Error, Result};
use serde_json::Value;

/// Adapter for Tastypie-style APIs
#[derive(Debug, Clone, Copy, Default)]
pub struct TastypieAdapter;

impl TastypieAdapter {
    /// Create a new Tastypie adapter
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for TastypieAdapter {
    fn extract_documents(&self, payload: &Value) -> Result<Vec<Value>> {
        match payload.get("objects") {
            Some(Value::Array(objects)) => Ok(objects.clone()),
            Some(_) => Err(Error::extraction("objects", "not an array")),
            None => Err(Error::extraction("objects", "missing from payload")),
        }
    }

    fn extract_continuation(&self, payload: &Value) -> Result<Option<ResumptionToken>> {
        let meta = payload
            .get("meta")
            .ok_or_else(|| Error::extraction("meta", "missing from payload"))?;

        match meta.get("next") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(next)) if next.trim().is_empty() => Ok(None),
            Some(Value::String(next)) => parse_next_uri(next).map(Some),
            Some(_) => Err(Error::extraction("meta.next", "not a string")),
        }
    }

    fn page_size_param(&self) -> Option<&str> {
        Some("limit")
    }
}
