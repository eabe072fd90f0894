// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]

//! # forest
//!
//! Foundations for clients of paginated, RESTful HTTP APIs.
//!
//! ## Features
//!
//! - **Resilient Transport**: Linear backoff retries on connection errors and 503s
//! - **Stable Error Taxonomy**: One error kind per HTTP status, transport errors translated
//! - **Lazy Pagination**: Whole collections exposed as one stream of documents
//! - **Pluggable Auth**: Tastypie API key, bearer token, custom headers, closures
//! - **API Flavors**: Tastypie out of the box, JSON paths for everything else
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forest::adapter::TastypieAdapter;
//! use forest::auth::ApiKeyAuth;
//! use forest::{Connector, ConnectorConfig, Result};
//! use futures::TryStreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectorConfig::builder("http://manager.scielo.org/api/v1/")
//!         .auth(Arc::new(ApiKeyAuth::new("alice", "s3cr3t")))
//!         .retry_timeout_factor(0.5)
//!         .build()?;
//!     let connector = Connector::new(config, TastypieAdapter::new())?;
//!
//!     // One resource
//!     let journal = connector.fetch_data(Some("journals/70"), None).await?;
//!
//!     // Every document of a collection, page by page
//!     let mut journals = connector.iter_documents(Some("journals"), None);
//!     while let Some(journal) = journals.try_next().await? {
//!         println!("{}", journal["title"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Connector                            │
//! │   fetch_data() (retry)   iter_documents()   post_data()     │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────────────┬───────────────┐
//! │    Adapter   │         HTTP Broker          │     Auth      │
//! ├──────────────┼──────────────────────────────┼───────────────┤
//! │ Tastypie     │ URL assembly, sorted params  │ API Key       │
//! │ JSON paths   │ Status → Error, TLS toggle   │ Bearer        │
//! │              │ Transport error translation  │ Headers       │
//! └──────────────┴──────────────────────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Authentication hooks
pub mod auth;

/// Request broker
pub mod http;

/// API-flavor adapters
pub mod adapter;

/// Connector configuration
pub mod config;

/// Retrying, paginating connector
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use adapter::{Adapter, ResumptionToken};
pub use config::{ConnectorConfig, ConnectorSettings};
pub use connector::{Connector, Documents};
pub use error::{Error, ErrorKind, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
