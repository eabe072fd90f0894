//! Request normalization
//!
//! Pure helpers that turn caller input into what goes on the wire: the URL,
//! the canonical query string and the POST body.

use crate::error::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Scheme prepended to URLs that carry none
pub const DEFAULT_SCHEME: &str = "http";

// ============================================================================
// URL assembly
// ============================================================================

/// Join URI segments into a full URL.
///
/// Empty segments are skipped, slashes around each segment are collapsed,
/// the result always ends with exactly one `/`, and `http://` is prepended
/// when neither `http://` nor `https://` is present.
///
/// ```
/// use forest::http::make_full_url;
///
/// assert_eq!(
///     make_full_url(&["manager.scielo.org", "/api/v1/", "journals"]),
///     "http://manager.scielo.org/api/v1/journals/"
/// );
/// ```
pub fn make_full_url<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|seg| seg.as_ref().trim_matches('/'))
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let mut url = if joined.starts_with("http://") || joined.starts_with("https://") {
        joined
    } else {
        format!("{DEFAULT_SCHEME}://{joined}")
    };
    url.push('/');
    url
}

// ============================================================================
// Query parameters
// ============================================================================

/// A query parameter value: one string or a list sent as repeated keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `key=value`
    One(String),
    /// `key=a&key=b`
    Many(Vec<String>),
}

impl ParamValue {
    /// The values in wire order
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    fn push(&mut self, value: ParamValue) {
        let mut values = match std::mem::replace(self, Self::Many(Vec::new())) {
            Self::One(v) => vec![v],
            Self::Many(vs) => vs,
        };
        match value {
            Self::One(v) => values.push(v),
            Self::Many(vs) => values.extend(vs),
        }
        *self = Self::Many(values);
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Unordered key to value mapping representing a query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(HashMap<String, ParamValue>);

impl QueryParams {
    /// Create empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Add a parameter, turning an existing key into a list
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Occupied(mut existing) => existing.get_mut().push(value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    /// Builder-style [`QueryParams::insert`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a parameter
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no params
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys and values in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

impl From<HashMap<String, ParamValue>> for QueryParams {
    fn from(map: HashMap<String, ParamValue>) -> Self {
        Self(map)
    }
}

/// Turn params into the canonical pair sequence sent on the wire.
///
/// Pairs are sorted by key; list values expand into repeated keys, keeping
/// their own order. `None` stays `None`.
pub fn prepare_params(params: Option<&QueryParams>) -> Option<Vec<(String, String)>> {
    let params = params?;

    let mut pairs: Vec<(String, String)> = params
        .iter()
        .flat_map(|(key, value)| {
            value
                .values()
                .iter()
                .map(move |v| (key.clone(), v.clone()))
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Some(pairs)
}

// ============================================================================
// POST body
// ============================================================================

/// Data sent as a POST body
#[derive(Debug, Clone, PartialEq)]
pub enum PostData {
    /// Already encoded payload, sent unchanged
    Raw(Bytes),
    /// Value encoded as JSON before sending
    Json(Value),
}

impl From<&str> for PostData {
    fn from(data: &str) -> Self {
        Self::Raw(Bytes::copy_from_slice(data.as_bytes()))
    }
}

impl From<String> for PostData {
    fn from(data: String) -> Self {
        Self::Raw(Bytes::from(data))
    }
}

impl From<Vec<u8>> for PostData {
    fn from(data: Vec<u8>) -> Self {
        Self::Raw(Bytes::from(data))
    }
}

impl From<Bytes> for PostData {
    fn from(data: Bytes) -> Self {
        Self::Raw(data)
    }
}

impl From<Value> for PostData {
    fn from(data: Value) -> Self {
        Self::Json(data)
    }
}

/// Encode POST data: raw payloads pass through, everything else becomes JSON
pub fn prepare_body(data: &PostData) -> Result<Bytes> {
    match data {
        PostData::Raw(bytes) => Ok(bytes.clone()),
        PostData::Json(value) => Ok(Bytes::from(serde_json::to_vec(value)?)),
    }
}
