// src/fixtures.rs
//! Fixed inputs for both suites. Everything here is constant so runs are reproducible.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch::PublicMetrics;

/// One input post for the classification suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePost {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub public_metrics: PublicMetrics,
}

/// Text used by the single-classification case.
pub const SINGLE_TEXT: &str = "This is amazing! I can't believe how well this works! * #awesome";

/// Topic/count/method triple for the fetch suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCase {
    pub topic: &'static str,
    pub count: u32,
    pub method: &'static str,
}

impl FetchCase {
    /// Identifier used in tally lines, e.g. `#python`.
    pub fn case_id(&self) -> String {
        format!("#{}", self.topic)
    }
}

fn post(id: &str, text: &str, author: &str, hour: u32, likes: u32, rts: u32) -> SamplePost {
    SamplePost {
        id: id.to_string(),
        text: text.to_string(),
        author_id: author.to_string(),
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 15, hour, 0, 0)
            .single()
            .unwrap_or_default(),
        public_metrics: PublicMetrics {
            like_count: likes,
            retweet_count: rts,
        },
    }
}

/// Four posts: clearly positive, clearly negative, neutral, sarcastic (negative-leaning).
pub fn sample_posts() -> Vec<SamplePost> {
    vec![
        post(
            "1",
            "I absolutely love this new Python library! It makes coding so much easier 😍 #python",
            "user1",
            10,
            25,
            10,
        ),
        post(
            "2",
            "This is the worst bug I have ever encountered. Completely broken! 😡 #frustrated",
            "user2",
            11,
            3,
            1,
        ),
        post(
            "3",
            "Just updating my documentation. Nothing exciting happening today. #work",
            "user3",
            12,
            8,
            2,
        ),
        post(
            "4",
            "Yeah, right... this \"amazing\" feature is totally not working 🙄 #sarcasm",
            "user4",
            13,
            15,
            5,
        ),
    ]
}

pub fn fetch_cases() -> Vec<FetchCase> {
    vec![
        FetchCase {
            topic: "python",
            count: 5,
            method: "requests",
        },
        FetchCase {
            topic: "ai",
            count: 5,
            method: "requests",
        },
        FetchCase {
            topic: "javascript",
            count: 3,
            method: "requests",
        },
        FetchCase {
            topic: "machinelearning",
            count: 3,
            method: "requests",
        },
    ]
}
