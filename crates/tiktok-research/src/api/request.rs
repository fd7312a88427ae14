use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use url::Url;

use super::*;

/// Build the header set attached to every research API request.
pub fn build_headers(token: &BearerToken) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, token.authorization().clone());
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Execute a single POST with auth headers, the field list, and a JSON body.
///
/// Returns the status and raw body; status interpretation is left to the
/// caller so that retryable statuses can be told apart.
pub(super) async fn post_json(
    http: &reqwest::Client,
    url: Url,
    headers: &HeaderMap,
    fields: Option<&str>,
    body: &Map<String, Value>,
) -> Result<(StatusCode, String), ResearchError> {
    let mut request = http.post(url).headers(headers.clone()).json(body);
    if let Some(fields) = fields {
        request = request.query(&[("fields", fields)]);
    }

    let resp = request.send().await?;
    let status = resp.status();
    let resp_body = resp.text().await?;
    tracing::trace!(status = status.as_u16(), len = resp_body.len(), "Research API response");

    Ok((status, resp_body))
}
