//! Client-credentials token exchange for the research API.
//!
//! One form-encoded POST per call. Retrying a failed exchange is left to
//! the caller.

use reqwest::header::{CACHE_CONTROL, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::{BearerToken, ClientConfig, ResearchError};

const TOKEN_PATH: &str = "/v2/oauth/token/";

/// Token endpoint response. Failures come back with `error` set and no
/// `access_token`, sometimes under a 200.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchanges a client key/secret pair for a bearer token.
pub struct ResearchAuth {
    client_key: String,
    client_secret: String,
    token_url: Url,
    http: reqwest::Client,
}

impl ResearchAuth {
    pub fn new(
        client_key: impl Into<String>,
        client_secret: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self, ResearchError> {
        Ok(Self {
            client_key: client_key.into(),
            client_secret: client_secret.into(),
            token_url: config.endpoint_url(TOKEN_PATH)?,
            http: config.http_client()?,
        })
    }

    /// Request a client-credentials access token.
    pub async fn create_bearer_token(&self) -> Result<BearerToken, ResearchError> {
        let params = [
            ("client_key", self.client_key.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(self.token_url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let token = parse_token_response(status, &body)?;
        tracing::info!("Obtained research API access token");
        Ok(token)
    }
}

/// Exchange credentials against the default endpoint.
pub async fn create_bearer_token(
    client_key: &str,
    client_secret: &str,
) -> Result<BearerToken, ResearchError> {
    ResearchAuth::new(client_key, client_secret, &ClientConfig::default())?
        .create_bearer_token()
        .await
}

fn parse_token_response(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<BearerToken, ResearchError> {
    let parsed: Option<TokenResponse> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let detail = parsed
            .and_then(|r| describe_error(&r))
            .unwrap_or_else(|| body.to_string());
        return Err(ResearchError::Authentication(format!(
            "token endpoint returned {status}: {detail}"
        )));
    }

    let Some(resp) = parsed else {
        return Err(ResearchError::Authentication(format!(
            "token response is not JSON: {body}"
        )));
    };

    match resp.access_token {
        Some(token) if !token.is_empty() => {
            tracing::debug!(expires_in = ?resp.expires_in, "Token response parsed");
            BearerToken::new(token)
        }
        _ => Err(ResearchError::Authentication(
            describe_error(&resp).unwrap_or_else(|| "response has no access_token".into()),
        )),
    }
}

fn describe_error(resp: &TokenResponse) -> Option<String> {
    match (&resp.error, &resp.error_description) {
        (Some(e), Some(d)) => Some(format!("{e}: {d}")),
        (Some(e), None) => Some(e.clone()),
        (None, Some(d)) => Some(d.clone()),
        (None, None) => None,
    }
}
