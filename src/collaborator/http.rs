// src/collaborator/http.rs
//! JSON client for a sentiment/fetch backend. One request per call, no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Classifier, Fetcher};
use crate::error::CollaboratorError;
use crate::fetch::FetchResult;
use crate::fixtures::SamplePost;
use crate::sentiment::{ClassificationResult, SingleClassification};

/// Longest error body echoed into a diagnostic.
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone)]
struct Backend {
    http: reqwest::Client,
    base_url: String,
}

impl Backend {
    fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("collab-check/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CollaboratorError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CollaboratorError> {
        let url = self.url(path);
        tracing::debug!(%url, "backend POST");
        let resp = self.http.post(&url).json(body).send().await?;
        Self::read(resp).await
    }
}

/// Classification collaborator behind `POST /api/sentiment/{batch,analyze}`.
pub struct HttpClassifier {
    backend: Backend,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            backend: Backend::new(base_url, timeout)?,
        })
    }
}

#[derive(Serialize)]
struct BatchReq<'a> {
    tweets: &'a [SamplePost],
}

#[derive(Serialize)]
struct SingleReq<'a> {
    text: &'a str,
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn analyze_batch(
        &self,
        posts: &[SamplePost],
    ) -> Result<ClassificationResult, CollaboratorError> {
        self.backend
            .post("/api/sentiment/batch", &BatchReq { tweets: posts })
            .await
    }

    async fn analyze_single(&self, text: &str) -> Result<SingleClassification, CollaboratorError> {
        self.backend
            .post("/api/sentiment/analyze", &SingleReq { text })
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Fetch collaborator behind `GET /api/tweets`.
pub struct HttpFetcher {
    backend: Backend,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            backend: Backend::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        topic: &str,
        count: u32,
        method: &str,
    ) -> Result<FetchResult, CollaboratorError> {
        let url = self.backend.url("/api/tweets");
        tracing::debug!(%url, topic, count, method, "backend GET");
        let count = count.to_string();
        let resp = self
            .backend
            .http
            .get(&url)
            .query(&[("hashtag", topic), ("count", count.as_str()), ("method", method)])
            .send()
            .await?;
        Backend::read(resp).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
