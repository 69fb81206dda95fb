use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends `Authorization: Bearer <token>`.
///
/// Built per request because the token is owned by the token manager and
/// may be refreshed between calls.
pub struct Bearer<'a, C: ?Sized> {
    inner: &'a C,
    value: HeaderValue,
}

impl<'a, C: ?Sized> Bearer<'a, C> {
    /// Fails when the token contains bytes that are not valid in a header.
    pub fn new(inner: &'a C, token: &str) -> Result<Self, reqwest::header::InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        Ok(Self { inner, value })
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Bearer<'_, C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_token_with_newline() {
        let client = crate::fetch::BasicClient::new(
            std::time::Duration::from_secs(1),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        assert!(Bearer::new(&client, "abc\ndef").is_err());
        assert!(Bearer::new(&client, "abc.def").is_ok());
    }
}
