use std::collections::VecDeque;

use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::StatusCode;
use url::Url;

use super::envelope::parse_envelope;
use super::*;

/// Lazily paginated results of one call.
///
/// A page is requested only when the consumer polls past the items already
/// buffered, and dropping the stream cancels any request in flight.
pub type ItemStream<T> = BoxStream<'static, Result<T, ResearchError>>;

/// Marker in the 400 message sent when a just-issued search id is reused
/// too quickly.
const EXPIRED_SEARCH_ID: &str = "invalid or expired";

/// Pagination position returned with a page and threaded into the next request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    pub cursor: Option<i64>,
    pub search_id: Option<String>,
    pub has_more: bool,
}

/// Which non-success statuses an endpoint retries in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryPolicy {
    Never,
    /// 429 only.
    RateLimit,
    /// 429, plus 500, 504 and the expired-search-id 400.
    Search,
}

/// Per-endpoint specialization of the engine.
pub(crate) struct Endpoint<T> {
    pub path: &'static str,
    pub fields: Option<&'static str>,
    pub variant: Variant,
    pub retry: RetryPolicy,
    /// Paginated endpoints end quietly on an unexpected payload shape;
    /// single-page endpoints fail.
    pub paginated: bool,
    pub extract: fn(ResponseData) -> Option<Page<T>>,
}

pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub state: PageState,
}

impl<T> Page<T> {
    /// A page with nothing after it.
    pub(crate) fn last(items: Vec<T>) -> Self {
        Self {
            items,
            state: PageState::default(),
        }
    }

    pub(crate) fn resumable(
        items: Vec<T>,
        cursor: i64,
        search_id: Option<String>,
        has_more: bool,
    ) -> Self {
        Self {
            items,
            state: PageState {
                cursor: Some(cursor),
                search_id,
                has_more,
            },
        }
    }
}

/// State of one in-flight call. Owned by the stream; never shared.
pub(crate) struct PageSession<T> {
    http: reqwest::Client,
    headers: HeaderMap,
    config: Arc<ClientConfig>,
    endpoint: Endpoint<T>,
    url: Url,
    /// Body of the next request; `None` once the call is finished.
    next_body: Option<Map<String, Value>>,
    buffered: VecDeque<T>,
    /// Consecutive 504s; any other status clears it.
    gateway_timeouts: u32,
}

impl ResearchClient {
    /// Start a paginated call, surfacing a body-building error as the
    /// stream's only item.
    pub(super) fn paginate<T: Send + 'static>(
        &self,
        endpoint: Endpoint<T>,
        seed: Result<Map<String, Value>, ResearchError>,
    ) -> ItemStream<T> {
        match seed.and_then(|seed| PageSession::new(self, endpoint, seed)) {
            Ok(session) => session.into_stream(),
            Err(e) => stream::once(async move { Err::<T, ResearchError>(e) }).boxed(),
        }
    }
}

impl<T: Send + 'static> PageSession<T> {
    pub(crate) fn new(
        client: &ResearchClient,
        endpoint: Endpoint<T>,
        seed: Map<String, Value>,
    ) -> Result<Self, ResearchError> {
        let url = client.config.endpoint_url(endpoint.path)?;
        let logged_body = Value::Object(seed.clone());
        tracing::debug!(
            endpoint = endpoint.path,
            body = %logged_body,
            "Starting research query"
        );
        Ok(Self {
            http: client.http.clone(),
            headers: client.headers.clone(),
            config: Arc::clone(&client.config),
            endpoint,
            url,
            next_body: Some(seed),
            buffered: VecDeque::new(),
            gateway_timeouts: 0,
        })
    }

    pub(crate) fn into_stream(self) -> ItemStream<T> {
        stream::try_unfold(self, Self::next_item).boxed()
    }

    /// Pop a buffered item, requesting the next page only when the buffer
    /// is empty and the previous page said there is more.
    async fn next_item(mut self) -> Result<Option<(T, Self)>, ResearchError> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Ok(Some((item, self)));
            }
            let Some(body) = self.next_body.take() else {
                return Ok(None);
            };
            let Some(Page { items, state }) = self.request_page(&body).await? else {
                return Ok(None);
            };
            self.next_body = self.advance(body, state);
            self.buffered.extend(items);
        }
    }

    /// Fetch a single-page response and return its one item.
    pub(crate) async fn into_single(mut self) -> Result<T, ResearchError> {
        let body = self.next_body.take().unwrap_or_default();
        let variant = self.endpoint.variant;
        self.request_page(&body)
            .await?
            .and_then(|page| page.items.into_iter().next())
            .ok_or_else(|| ResearchError::SchemaValidation {
                variant,
                reason: "response carried no item".into(),
            })
    }

    /// Build the next request body from the page just received, or `None`
    /// when the call is done.
    fn advance(
        &self,
        mut body: Map<String, Value>,
        state: PageState,
    ) -> Option<Map<String, Value>> {
        if !state.has_more {
            return None;
        }
        let Some(cursor) = state.cursor else {
            tracing::warn!(
                endpoint = self.endpoint.path,
                "has_more set without a cursor, stopping"
            );
            return None;
        };

        body.insert("cursor".into(), cursor.into());
        if let Some(search_id) = state.search_id {
            body.insert("search_id".into(), search_id.into());
        }
        Some(body)
    }

    async fn request_page(
        &mut self,
        body: &Map<String, Value>,
    ) -> Result<Option<Page<T>>, ResearchError> {
        let raw = self.send(body).await?;
        let envelope = parse_envelope(raw, self.endpoint.variant)?;

        match (self.endpoint.extract)(envelope.data) {
            Some(page) => {
                tracing::debug!(
                    endpoint = self.endpoint.path,
                    items = page.items.len(),
                    cursor = ?page.state.cursor,
                    has_more = page.state.has_more,
                    "Fetched page"
                );
                Ok(Some(page))
            }
            None if self.endpoint.paginated => {
                tracing::warn!(
                    endpoint = self.endpoint.path,
                    variant = %self.endpoint.variant,
                    "Unexpected payload shape, ending results"
                );
                Ok(None)
            }
            None => Err(ResearchError::SchemaValidation {
                variant: self.endpoint.variant,
                reason: "payload does not match the expected shape".into(),
            }),
        }
    }

    /// POST `body` until a success status arrives or a fatal status is hit.
    async fn send(&mut self, body: &Map<String, Value>) -> Result<Value, ResearchError> {
        let path = self.endpoint.path;
        let retry = self.endpoint.retry;

        loop {
            let (status, text) = request::post_json(
                &self.http,
                self.url.clone(),
                &self.headers,
                self.endpoint.fields,
                body,
            )
            .await?;

            // Only an unbroken run of 504s counts toward the abort.
            if status != StatusCode::GATEWAY_TIMEOUT {
                self.gateway_timeouts = 0;
            }

            if status.is_success() {
                return Ok(serde_json::from_str(&text)?);
            }

            match status {
                StatusCode::TOO_MANY_REQUESTS if retry != RetryPolicy::Never => {
                    tracing::warn!(endpoint = path, body = %text, "Too many requests, backing off");
                    tokio::time::sleep(self.config.rate_limit_backoff).await;
                }
                StatusCode::GATEWAY_TIMEOUT if retry == RetryPolicy::Search => {
                    self.gateway_timeouts += 1;
                    if self.gateway_timeouts >= self.config.max_gateway_timeouts {
                        tracing::error!(
                            endpoint = path,
                            attempts = self.gateway_timeouts,
                            "Gateway keeps timing out, aborting"
                        );
                        return Err(ResearchError::Aborted {
                            attempts: self.gateway_timeouts,
                            message: text,
                        });
                    }
                    tracing::warn!(
                        endpoint = path,
                        attempt = self.gateway_timeouts,
                        "Gateway timeout, backing off"
                    );
                    tokio::time::sleep(self.config.gateway_timeout_backoff).await;
                }
                StatusCode::INTERNAL_SERVER_ERROR if retry == RetryPolicy::Search => {
                    tracing::warn!(endpoint = path, "Internal server error, retrying");
                }
                StatusCode::BAD_REQUEST
                    if retry == RetryPolicy::Search && is_expired_search_id(&text) =>
                {
                    tracing::warn!(
                        endpoint = path,
                        "Search id not accepted yet, waiting before retry"
                    );
                    tokio::time::sleep(self.config.search_id_backoff).await;
                }
                _ => {
                    tracing::warn!(
                        endpoint = path,
                        status = status.as_u16(),
                        body = %text,
                        "Research API request failed"
                    );
                    return Err(ResearchError::ApiRequest {
                        status: status.as_u16(),
                        message: text,
                    });
                }
            }
        }
    }
}

fn is_expired_search_id(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(|message| message.contains(EXPIRED_SEARCH_ID))
        })
        .unwrap_or(false)
}
