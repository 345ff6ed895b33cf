// src/fetch.rs
//! Records returned by the fetch collaborator.

use serde::{Deserialize, Serialize};

/// Provenance assumed when a post carries no `source` tag.
pub const DEFAULT_SOURCE: &str = "twitter";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub retweet_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedPost {
    pub text: String,
    pub author_id: String,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl FetchedPost {
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }
}

/// Ordered posts for one fetch call. Deserializes from a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchResult {
    pub posts: Vec<FetchedPost>,
}

impl FetchResult {
    pub fn new(posts: Vec<FetchedPost>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// `(source, count)` pairs in order of first appearance.
    pub fn source_breakdown(&self) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = Vec::new();
        for p in &self.posts {
            match out.iter_mut().find(|(s, _)| s == p.source()) {
                Some((_, n)) => *n += 1,
                None => out.push((p.source().to_string(), 1)),
            }
        }
        out
    }
}
