use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes outbound HTTP requests.
///
/// Everything that talks to the upstream API goes through this trait so
/// request decorators (see [`crate::fetch::auth::Bearer`]) can be stacked
/// on top of a concrete client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
