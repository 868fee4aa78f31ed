use popstore_model::prelude::{
    ApiResponse, ListingDetail, ListingId, ListingSummary, LoginRequest,
};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::domains::auth::AuthToken;
use crate::infra::routes;

/// HTTP client for the listing API.
///
/// Holds no credentials of its own: authenticated calls take the caller's
/// [`AuthToken`] explicitly, so the session stays the single owner of it.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Add `http://` when no scheme is given and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

impl ApiClient {
    /// Create a new API client with the default 30s request timeout.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let original = base_url.as_ref();
        let base_url = normalize_base_url(original);
        if base_url != original {
            warn!(
                "[ApiClient] Normalized base URL from '{}' to '{}'",
                original, base_url
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self { client, base_url })
    }

    /// Join an API path onto the base URL.
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(
        &self,
        builder: RequestBuilder,
        token: Option<&AuthToken>,
    ) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Send a request and unwrap the `ApiResponse` envelope. A `null` result
    /// is returned as `None`; callers decide whether that is acceptable.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = request.send().await.context("request failed")?;

        match response.status() {
            status if status.is_success() => {
                if status == StatusCode::NO_CONTENT {
                    return Ok(None);
                }
                let envelope: ApiResponse<T> = response
                    .json()
                    .await
                    .context("invalid response envelope")?;
                Ok(envelope.into_result())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(anyhow!("Unauthorized - please login again"))
            }
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(anyhow!(
                    "Request failed with status {}: {}",
                    status,
                    error_text
                ))
            }
        }
    }

    async fn execute_required<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        self.execute(request)
            .await?
            .ok_or_else(|| anyhow!("Empty response from server"))
    }

    /// GET request, optionally authenticated
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);
        let request = self.with_auth(self.client.get(&url), token);
        self.execute_required(request).await
    }

    /// POST request with an optional JSON body
    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        token: Option<&AuthToken>,
    ) -> Result<Option<R>> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {}", url);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.with_auth(request, token);
        self.execute(request).await
    }

    /// DELETE request
    pub async fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
    ) -> Result<Option<R>> {
        let url = self.build_url(path);
        debug!("[ApiClient] DELETE {}", url);
        let request = self.with_auth(self.client.delete(&url), token);
        self.execute(request).await
    }
}

impl ApiClient {
    pub async fn listing_detail(&self, id: ListingId) -> Result<ListingDetail> {
        self.get(&routes::listing::detail(id), None).await
    }

    pub async fn record_view(&self, id: ListingId) -> Result<u64> {
        self.get(&routes::listing::views(id), None).await
    }

    pub async fn list_listings(&self) -> Result<Vec<ListingSummary>> {
        self.get(routes::listing::LIST, None).await
    }

    pub async fn list_popular(&self) -> Result<Vec<ListingSummary>> {
        self.get(routes::listing::POPULAR, None).await
    }

    pub async fn like_count(&self, id: ListingId) -> Result<u64> {
        self.get(&routes::like::count(id), None).await
    }

    /// Flip the like relation on. Returns the server's new count.
    pub async fn like(&self, id: ListingId, token: &AuthToken) -> Result<u64> {
        self.post::<(), u64>(&routes::like::toggle(id), None, Some(token))
            .await?
            .ok_or_else(|| anyhow!("like endpoint returned no count"))
    }

    /// Inverse of [`ApiClient::like`]. Returns the server's new count.
    pub async fn unlike(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> Result<u64> {
        self.delete::<u64>(&routes::like::toggle(id), Some(token))
            .await?
            .ok_or_else(|| anyhow!("unlike endpoint returned no count"))
    }

    pub async fn is_favorited(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> Result<bool> {
        let favorited: Option<bool> = self
            .execute(self.with_auth(
                self.client.get(self.build_url(routes::favorite::check(id))),
                Some(token),
            ))
            .await?;
        Ok(favorited == Some(true))
    }

    pub async fn add_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> Result<()> {
        self.post::<(), serde_json::Value>(
            &routes::favorite::add(id),
            None,
            Some(token),
        )
        .await?;
        Ok(())
    }

    pub async fn remove_favorite(
        &self,
        id: ListingId,
        token: &AuthToken,
    ) -> Result<()> {
        self.delete::<serde_json::Value>(&routes::favorite::remove(id), Some(token))
            .await?;
        Ok(())
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthToken> {
        let token: String = self
            .post(routes::member::LOGIN, Some(request), None)
            .await?
            .ok_or_else(|| anyhow!("login returned no token"))?;
        Ok(AuthToken::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_scheme_and_trailing_slash() {
        assert_eq!(normalize_base_url("localhost:8080/"), "http://localhost:8080");
        assert_eq!(
            normalize_base_url(" https://api.example.com// "),
            "https://api.example.com"
        );
    }

    #[test]
    fn builds_urls_from_relative_paths() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.build_url("/post/detail/3"),
            "http://localhost:8080/post/detail/3"
        );
        assert_eq!(
            client.build_url("favorite/check/3"),
            "http://localhost:8080/favorite/check/3"
        );
        assert_eq!(
            client.build_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn debug_does_not_leak_client_internals() {
        let client = ApiClient::new("localhost:9000").unwrap();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("http://localhost:9000"));
    }
}
