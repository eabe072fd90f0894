//! API-flavor adapters
//!
//! Supports: Tastypie, configurable JSON paths
//!
//! # Overview
//!
//! An adapter knows where a given API flavor keeps the documents of a page
//! and how it points at the next page. The connector stays flavor-agnostic
//! and calls the two extraction hooks on every payload it fetches.

mod json_path;
mod tastypie;
mod types;

pub use json_path::{lookup_path, JsonPathAdapter};
pub use tastypie::TastypieAdapter;
pub use types::{parse_next_uri, Adapter, ResumptionToken};
