//! Connector module
//!
//! Fetches resources from a paginated REST API and exposes whole
//! collections as one lazy stream of documents.
//!
//! # Overview
//!
//! ```text
//! iter_documents(resource, params)
//!   └─ fetch_data ──(retry on Connection / 503)──▶ Transport::get
//!        └─ Adapter::extract_documents ──▶ yield each document
//!             └─ Adapter::extract_continuation ──▶ next page or end
//! ```

mod client;
mod documents;

pub use client::Connector;
pub use documents::Documents;
