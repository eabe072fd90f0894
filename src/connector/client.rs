//! Connector implementation
//!
//! Owns the retry policy around the broker's GET.

use super::documents::Documents;
use crate::adapter::Adapter;
use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::http::{make_full_url, HttpBroker, PostData, QueryParams, Transport};
use serde_json::Value;
use tracing::{debug, warn};

/// Client for one paginated REST API
///
/// Holds its own configuration, the adapter for the API flavor and the
/// transport requests go through. No state is kept between calls: every
/// [`Connector::fetch_data`] starts with a fresh retry count.
pub struct Connector<A, T = HttpBroker> {
    config: ConnectorConfig,
    adapter: A,
    transport: T,
}

impl<A: Adapter> Connector<A> {
    /// Create a connector dispatching through a default [`HttpBroker`]
    pub fn new(config: ConnectorConfig, adapter: A) -> Result<Self> {
        Ok(Self::with_transport(config, adapter, HttpBroker::new()?))
    }
}

impl<A: Adapter, T: Transport> Connector<A, T> {
    /// Create a connector over a custom transport
    pub fn with_transport(config: ConnectorConfig, adapter: A, transport: T) -> Self {
        Self {
            config,
            adapter,
            transport,
        }
    }

    /// The connector's configuration
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// The API-flavor adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The transport requests are dispatched through
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL of a resource below the API root
    pub fn resource_url(&self, resource: Option<&str>) -> String {
        match resource {
            Some(resource) => make_full_url(&[self.config.api_uri(), resource]),
            None => make_full_url(&[self.config.api_uri()]),
        }
    }

    /// GET a resource, retrying transient failures.
    ///
    /// `Connection` errors and `503 Service Unavailable` are retried up to
    /// `max_retries` times, waiting `retry * retry_timeout_factor` seconds
    /// before each retry. Once the bound is reached the last error is
    /// returned unchanged; any other error is returned on first occurrence.
    pub async fn fetch_data(
        &self,
        resource: Option<&str>,
        params: Option<&QueryParams>,
    ) -> Result<Value> {
        let url = self.resource_url(resource);
        let options = self.config.request_options();
        let max_retries = self.config.max_retries();
        let mut retries = 0;

        loop {
            match self.transport.get(&url, params, &options).await {
                Ok(payload) => {
                    debug!(url = %url, retries, "Fetched resource");
                    return Ok(payload);
                }
                Err(err) if err.is_retryable() && retries < max_retries => {
                    let delay = self.config.backoff(retries);
                    warn!(
                        "Request to {} failed ({}), attempt {}/{}, retrying in {:?}",
                        url,
                        err,
                        retries + 1,
                        max_retries.saturating_add(1),
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// POST data to a resource and return the created resource's location.
    ///
    /// Creation is not retried.
    pub async fn post_data(
        &self,
        resource: Option<&str>,
        data: impl Into<PostData>,
    ) -> Result<String> {
        let url = self.resource_url(resource);
        self.transport
            .post(&url, &data.into(), &self.config.request_options())
            .await
    }

    /// Lazily stream every document of a collection, following
    /// continuation links page by page.
    ///
    /// Nothing is fetched until the stream is polled, and a page is only
    /// requested once the previous one has been fully consumed. When the
    /// adapter declares a page size parameter that `params` lacks, the first
    /// request carries `items_per_request` under it.
    pub fn iter_documents(
        &self,
        resource: Option<&str>,
        params: Option<QueryParams>,
    ) -> Documents<'_, A, T> {
        let params = match self.adapter.page_size_param() {
            Some(key) if !params.as_ref().is_some_and(|p| p.contains_key(key)) => {
                let mut params = params.unwrap_or_default();
                params.insert(key, self.config.items_per_request());
                Some(params)
            }
            _ => params,
        };

        Documents::new(self, resource.map(str::to_string), params)
    }
}

impl<A: std::fmt::Debug, T> std::fmt::Debug for Connector<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("config", &self.config)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
