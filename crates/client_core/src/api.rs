//! HTTP client for the recommendation backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Recommendation, StoredRecommendation},
    error::ErrorBody,
    protocol::{
        CachedRecommendationsQuery, CreateUserRequest, RecommendationsResponse, RefreshOptions,
        RefreshRecommendationsResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::RequestError};

#[async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Registers a tag with the backend. Any 2xx counts as success.
    async fn create_user(&self, tag: &str) -> Result<(), RequestError>;
    async fn recommendations(&self, tag: &str) -> Result<Vec<Recommendation>, RequestError>;
    /// Forces the backend to regenerate and store recommendations for `tag`.
    async fn refresh_recommendations(
        &self,
        tag: &str,
        options: RefreshOptions,
    ) -> Result<Vec<Recommendation>, RequestError>;
    /// Reads back whatever the backend last stored for `tag`.
    async fn cached_recommendations(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<StoredRecommendation>, RequestError>;
}

pub struct HttpRecommendationApi {
    http: Client,
    base_url: Url,
}

impl HttpRecommendationApi {
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RequestError> {
        Self::with_timeout(&settings.api_base_url, settings.request_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, RequestError> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Dot-only segments are rejected; `url` would drop them and reroute the call.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(RequestError::DotSegment(segment.to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, RequestError> {
    let url = Url::parse(raw.trim()).map_err(|err| RequestError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RequestError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.cannot_be_a_base() {
        return Err(RequestError::InvalidUrl {
            url: raw.to_string(),
            reason: "cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

async fn check_status(response: Response) -> Result<Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .bytes()
        .await
        .inspect_err(|err| debug!(status = status.as_u16(), %err, "failed to read error body"))
        .unwrap_or_default();
    let detail = ErrorBody::from_bytes(&body).and_then(|body| body.message());
    debug!(status = status.as_u16(), ?detail, "backend rejected request");
    Err(RequestError::Status { status, detail })
}

#[async_trait]
impl RecommendationApi for HttpRecommendationApi {
    async fn create_user(&self, tag: &str) -> Result<(), RequestError> {
        let url = self.endpoint(&["users", ""])?;
        debug!(%url, tag, "creating user");
        let response = self
            .http
            .post(url)
            .json(&CreateUserRequest {
                tag: tag.to_string(),
            })
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn recommendations(&self, tag: &str) -> Result<Vec<Recommendation>, RequestError> {
        let url = self.endpoint(&["recommend", tag])?;
        debug!(%url, tag, "fetching recommendations");
        let response = self.http.get(url).send().await?;
        let body: RecommendationsResponse = check_status(response).await?.json().await?;
        Ok(body.into_list())
    }

    async fn refresh_recommendations(
        &self,
        tag: &str,
        options: RefreshOptions,
    ) -> Result<Vec<Recommendation>, RequestError> {
        let url = self.endpoint(&["users", tag, "recommendations", "refresh"])?;
        debug!(%url, tag, top_n = options.top_n, pop_cutoff = options.pop_cutoff, "refreshing recommendations");
        let response = self.http.get(url).query(&options).send().await?;
        let body: RefreshRecommendationsResponse = check_status(response).await?.json().await?;
        Ok(body.into_list())
    }

    async fn cached_recommendations(
        &self,
        tag: &str,
        limit: u32,
    ) -> Result<Vec<StoredRecommendation>, RequestError> {
        let url = self.endpoint(&["users", tag, "recommendations"])?;
        debug!(%url, tag, limit, "fetching stored recommendations");
        let response = self
            .http
            .get(url)
            .query(&CachedRecommendationsQuery { limit })
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
