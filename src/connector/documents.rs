//! Lazy document stream
//!
//! State machine:
//!
//! ```text
//! Pending ──▶ Fetching ──▶ Emitting ──(page exhausted)──▶ Pending | Done
//!                │             │
//!                └──(error)────┴──────────────────────────▶ Done
//! ```

use super::client::Connector;
use crate::adapter::Adapter;
use crate::error::Result;
use crate::http::{QueryParams, Transport};
use futures::future::BoxFuture;
use futures::stream::{FusedStream, Stream};
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

enum State<'a> {
    /// Next page known, not requested yet
    Pending {
        resource: Option<String>,
        params: Option<QueryParams>,
    },
    /// Page request in flight
    Fetching(BoxFuture<'a, Result<Value>>),
    /// Handing out the documents of the current page
    Emitting {
        payload: Value,
        documents: std::vec::IntoIter<Value>,
    },
    Done,
}

/// Single-pass stream over every document of a paginated collection
///
/// Created by [`Connector::iter_documents`]. Errors end the stream after
/// being yielded; iterating again requires a fresh call, which re-issues
/// the first request.
pub struct Documents<'a, A, T> {
    connector: &'a Connector<A, T>,
    state: State<'a>,
    pages: usize,
}

impl<'a, A: Adapter, T: Transport> Documents<'a, A, T> {
    pub(super) fn new(
        connector: &'a Connector<A, T>,
        resource: Option<String>,
        params: Option<QueryParams>,
    ) -> Self {
        Self {
            connector,
            state: State::Pending { resource, params },
            pages: 0,
        }
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }
}

impl<'a, A: Adapter, T: Transport> Stream for Documents<'a, A, T> {
    type Item = Result<Value>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match std::mem::replace(&mut this.state, State::Done) {
                State::Pending { resource, params } => {
                    let connector = this.connector;
                    this.state = State::Fetching(Box::pin(async move {
                        connector
                            .fetch_data(resource.as_deref(), params.as_ref())
                            .await
                    }));
                }

                State::Fetching(mut page) => match page.as_mut().poll(cx) {
                    Poll::Pending => {
                        this.state = State::Fetching(page);
                        return Poll::Pending;
                    }
                    Poll::Ready(Err(err)) => return Poll::Ready(Some(Err(err))),
                    Poll::Ready(Ok(payload)) => {
                        this.pages += 1;
                        match this.connector.adapter().extract_documents(&payload) {
                            Ok(documents) => {
                                debug!(
                                    page = this.pages,
                                    documents = documents.len(),
                                    "Fetched page"
                                );
                                this.state = State::Emitting {
                                    payload,
                                    documents: documents.into_iter(),
                                };
                            }
                            Err(err) => return Poll::Ready(Some(Err(err))),
                        }
                    }
                },

                State::Emitting {
                    payload,
                    mut documents,
                } => {
                    if let Some(document) = documents.next() {
                        this.state = State::Emitting { payload, documents };
                        return Poll::Ready(Some(Ok(document)));
                    }

                    match this.connector.adapter().extract_continuation(&payload) {
                        Ok(Some(token)) => {
                            this.state = State::Pending {
                                resource: Some(token.resource),
                                params: Some(token.params),
                            };
                        }
                        Ok(None) => {
                            debug!(pages = this.pages, "No further pages");
                            return Poll::Ready(None);
                        }
                        Err(err) => return Poll::Ready(Some(Err(err))),
                    }
                }

                State::Done => return Poll::Ready(None),
            }
        }
    }
}

impl<'a, A: Adapter, T: Transport> FusedStream for Documents<'a, A, T> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<A, T> std::fmt::Debug for Documents<'_, A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Pending { .. } => "pending",
            State::Fetching(_) => "fetching",
            State::Emitting { .. } => "emitting",
            State::Done => "done",
        };
        f.debug_struct("Documents")
            .field("state", &state)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}
