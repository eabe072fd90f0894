//! Configurable adapter for APIs that expose a records array and a
//! next-page URI somewhere in the body

use super::types::{parse_next_uri, Adapter, ResumptionToken};
use crate::error::{Error, Result};
use serde_json::Value;

/// Look up a dot-separated path (`$.meta.next` or `meta.next`).
///
/// `$` alone addresses the whole value.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}

/// Adapter driven by two paths into the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPathAdapter {
    /// Path to the array of documents
    pub records_path: String,
    /// Path to the next-page URI
    pub next_path: String,
    /// Query key carrying the page size
    pub page_size_param: Option<String>,
}

impl JsonPathAdapter {
    /// Create a new adapter
    pub fn new(records_path: impl Into<String>, next_path: impl Into<String>) -> Self {
        Self {
            records_path: records_path.into(),
            next_path: next_path.into(),
            page_size_param: None,
        }
    }

    /// Set the page size query key
    #[must_use]
    pub fn with_page_size_param(mut self, param: impl Into<String>) -> Self {
        self.page_size_param = Some(param.into());
        self
    }
}

impl Adapter for JsonPathAdapter {
    fn extract_documents(&self, payload: &Value) -> Result<Vec<Value>> {
        match lookup_path(payload, &self.records_path) {
            Some(Value::Array(records)) => Ok(records.clone()),
            Some(_) => Err(Error::extraction(&self.records_path, "not an array")),
            None => Err(Error::extraction(&self.records_path, "missing from payload")),
        }
    }

    fn extract_continuation(&self, payload: &Value) -> Result<Option<ResumptionToken>> {
        match lookup_path(payload, &self.next_path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(next)) if next.is_empty() => Ok(None),
            Some(Value::String(next)) => parse_next_uri(next).map(Some),
            Some(_) => Err(Error::extraction(&self.next_path, "not a string")),
        }
    }

    fn page_size_param(&self) -> Option<&str> {
        self.page_size_param.as_deref()
    }
}
