use chrono::{DateTime, Duration, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, StatusCode, Url};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, error, info};

use crate::config::Credentials;
use crate::error::AuthError;
use crate::fetch::{HttpClient, fragment};

/// Seconds subtracted from the declared token lifetime before caching it.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Lifetime assumed when the grant response omits `expires_in`.
const DEFAULT_LIFETIME_SECS: i64 = 300;

/// A bearer token together with the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Builds a token from a grant response, applying [`EXPIRY_MARGIN_SECS`].
    pub fn from_grant(value: String, lifetime_secs: i64, now: DateTime<Utc>) -> Self {
        Self {
            value,
            expires_at: now + Duration::seconds(lifetime_secs - EXPIRY_MARGIN_SECS),
        }
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Acquires and caches the upstream access token.
///
/// Constructed once at startup and shared by reference. Concurrent callers
/// that miss the cache may each run a grant; whichever completes last is the
/// token that stays cached.
pub struct TokenManager<C> {
    client: C,
    auth_url: Url,
    credentials: Credentials,
    cached: RwLock<Option<AccessToken>>,
}

impl<C: HttpClient> TokenManager<C> {
    pub fn new(client: C, auth_url: Url, credentials: Credentials) -> Self {
        Self {
            client,
            auth_url,
            credentials,
            cached: RwLock::new(None),
        }
    }

    /// Returns the cached token if still valid, otherwise runs a new grant.
    #[tracing::instrument(skip(self))]
    pub async fn get_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached().filter(|t| t.is_usable_at(Utc::now())) {
            debug!("Using cached access token");
            return Ok(token.value);
        }

        let token = self.refresh().await?;
        Ok(token.value)
    }

    /// Runs a client-credentials grant unconditionally and caches the result.
    pub async fn refresh(&self) -> Result<AccessToken, AuthError> {
        debug!(
            client_id = %self.credentials.redacted_id(),
            auth_url = %self.auth_url,
            "Requesting new access token"
        );

        let response = self
            .client
            .execute(self.grant_request())
            .await
            .map_err(|e| {
                error!(error = %e, "Error obtaining access token");
                AuthError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "Auth response received");

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            error!(
                status = status.as_u16(),
                body = fragment(&body, 100),
                "Authentication failed"
            );
            return Err(AuthError::Status(status.as_u16()));
        }

        let json: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse authentication response as JSON");
            AuthError::InvalidJson(e.to_string())
        })?;

        let value = json["access_token"]
            .as_str()
            .ok_or_else(|| {
                error!("No access_token found in response");
                AuthError::MissingAccessToken
            })?
            .to_string();

        let lifetime = json["expires_in"]
            .as_i64()
            .or_else(|| json["expires_in"].as_f64().map(|secs| secs as i64))
            .unwrap_or(DEFAULT_LIFETIME_SECS);

        let token = AccessToken::from_grant(value, lifetime, Utc::now());
        info!(expires_in = lifetime, "Obtained access token");
        self.store(token.clone());
        Ok(token)
    }

    /// Snapshot of the cached token, expired or not.
    pub fn cached(&self) -> Option<AccessToken> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn store(&self, token: AccessToken) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn grant_request(&self) -> Request {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("client_secret", &self.credentials.client_secret)
            .finish();

        let mut req = Request::new(Method::POST, self.auth_url.clone());
        let headers = req.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        *req.body_mut() = Some(body.into());
        req
    }
}
