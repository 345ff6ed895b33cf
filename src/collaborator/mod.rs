// src/collaborator/mod.rs
//! Black-box collaborators the harness drives.
//!
//! `http` talks to a configured backend; `stub` is a deterministic
//! in-process stand-in for offline runs and tests.

pub mod http;
pub mod stub;

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::fetch::FetchResult;
use crate::fixtures::SamplePost;
use crate::sentiment::{ClassificationResult, SingleClassification};

pub use http::{HttpClassifier, HttpFetcher};
pub use stub::{StubClassifier, StubFetcher};

/// Method reported when the credential is missing and the backend degrades.
pub const FALLBACK_METHOD: &str = "traditional";

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn analyze_batch(
        &self,
        posts: &[SamplePost],
    ) -> Result<ClassificationResult, CollaboratorError>;

    async fn analyze_single(&self, text: &str) -> Result<SingleClassification, CollaboratorError>;

    /// Collaborator name for diagnostics.
    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        topic: &str,
        count: u32,
        method: &str,
    ) -> Result<FetchResult, CollaboratorError>;

    fn name(&self) -> &'static str;
}
