use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used by the fetcher. Implementations may decorate requests
/// (headers, proxies) before executing them.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
