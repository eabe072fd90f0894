//! HTTP broker module
//!
//! Normalizes and dispatches individual requests.
//!
//! # Features
//!
//! - **URL Assembly**: Joins URI segments into one canonical URL
//! - **Canonical Query Strings**: Parameters are always sent sorted by key
//! - **Status Classification**: Error statuses map onto [`crate::error::Error`]
//! - **Transport Translation**: `reqwest` failures never leak to callers
//! - **Authentication**: Per-request auth hooks from the auth module

mod broker;
mod request;

pub use broker::{
    check_http_status, tls_verification, HttpBroker, RequestOptions, Transport,
    DEFAULT_USER_AGENT,
};
pub use request::{
    make_full_url, prepare_body, prepare_params, ParamValue, PostData, QueryParams,
    DEFAULT_SCHEME,
};
