use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, Request, StatusCode, Url};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::token::TokenManager;
use crate::error::{AuthError, GatewayError};
use crate::fetch::auth::Bearer;
use crate::fetch::{HttpClient, fragment};

/// Upstream resources the gateway reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Buses,
    LineVariants,
    BusStops,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Buses => "buses",
            Resource::LineVariants => "buses/linevariants",
            Resource::BusStops => "buses/busstops",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Bearer-authenticated GET client for the upstream API.
pub struct UpstreamClient<C> {
    client: C,
    base_url: String,
    tokens: Arc<TokenManager<C>>,
}

impl<C: HttpClient> UpstreamClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, tokens: Arc<TokenManager<C>>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager<C> {
        &self.tokens
    }

    /// Fetches `resource` and returns the parsed JSON payload.
    ///
    /// No retries: token failures, non-200 statuses, transport errors and
    /// unparseable bodies are each mapped to a [`GatewayError`].
    #[tracing::instrument(skip(self, resource, query), fields(resource = %resource))]
    pub async fn request(
        &self,
        resource: Resource,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, GatewayError> {
        let token = self.tokens.get_token().await?;

        let mut url = Url::parse(&format!("{}/{}", self.base_url, resource.path()))
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        info!(url = %url, "Making API request");

        let mut req = Request::new(Method::GET, url);
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        let authed = Bearer::new(&self.client, &token).map_err(|_| AuthError::InvalidHeader)?;
        let response = authed.execute(req).await.map_err(|e| {
            error!(error = %e, "API request error");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "API response received");

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read API response body");
            GatewayError::Transport(format!("{e} - Status code: {}", status.as_u16()))
        })?;

        if status != StatusCode::OK {
            error!(
                status = status.as_u16(),
                body = fragment(&body, 500),
                "API returned error status"
            );
            return Err(GatewayError::UpstreamHttp {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = fragment(&body, 500),
                "Failed to parse API response as JSON"
            );
            GatewayError::MalformedResponse
        })
    }
}
