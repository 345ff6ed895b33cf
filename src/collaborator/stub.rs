// src/collaborator/stub.rs
//! Deterministic in-process collaborators.
//!
//! The classifier labels text from a fixed fragment table (no scoring of its
//! own) and mirrors the backend's degradation: with a credential it reports
//! the metered `chatgpt` method, without one the `traditional` fallback.
//! The fetcher serves canned posts per topic.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{Classifier, Fetcher, FALLBACK_METHOD};
use crate::error::CollaboratorError;
use crate::fetch::{FetchResult, FetchedPost, PublicMetrics};
use crate::fixtures::SamplePost;
use crate::sentiment::{
    AdvancedDetection, AnalysisQuality, ApiUsage, ClassificationResult, DetailedAnalysis,
    DetectedElements, Insights, Sentiment, SingleClassification, PAID_METHOD,
};

/// Flat per-call price reported for the metered method.
pub const COST_PER_CALL: f64 = 0.00015;

/// Confidence at or above which an analysis counts as high confidence.
const HIGH_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone)]
struct LabelRule {
    fragment: String,
    sentiment: Sentiment,
    score: f64,
    confidence: f64,
    reasoning: Option<String>,
    detected: Option<DetectedElements>,
}

fn emoji(s: &str) -> Option<DetectedElements> {
    Some(DetectedElements {
        sarcasm: false,
        emoji_sentiment: Some(s.to_string()),
    })
}

fn fixture_rules() -> Vec<LabelRule> {
    vec![
        LabelRule {
            fragment: "absolutely love".into(),
            sentiment: Sentiment::Positive,
            score: 0.85,
            confidence: 0.92,
            reasoning: Some("Enthusiastic praise reinforced by a heart-eyes emoji".into()),
            detected: emoji("positive"),
        },
        LabelRule {
            fragment: "worst bug".into(),
            sentiment: Sentiment::Negative,
            score: -0.8,
            confidence: 0.9,
            reasoning: Some("Strong frustration about a broken feature".into()),
            detected: emoji("negative"),
        },
        LabelRule {
            fragment: "nothing exciting".into(),
            sentiment: Sentiment::Neutral,
            score: 0.0,
            confidence: 0.8,
            reasoning: Some("Routine status update without emotional charge".into()),
            detected: None,
        },
        LabelRule {
            fragment: "yeah, right".into(),
            sentiment: Sentiment::Negative,
            score: -0.6,
            confidence: 0.75,
            reasoning: Some("Quoted praise contradicted by the rest of the sentence".into()),
            detected: Some(DetectedElements {
                sarcasm: true,
                emoji_sentiment: Some("negative".into()),
            }),
        },
        LabelRule {
            fragment: "this is amazing".into(),
            sentiment: Sentiment::Positive,
            score: 0.9,
            confidence: 0.88,
            reasoning: Some("Exclamatory praise about results".into()),
            detected: None,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Call {
    Batch,
    Single,
}

pub struct StubClassifier {
    credential_present: bool,
    rules: Vec<LabelRule>,
    failing: BTreeMap<Call, String>,
}

impl StubClassifier {
    /// Stub preloaded with labels for the built-in fixtures.
    pub fn new(credential_present: bool) -> Self {
        Self {
            credential_present,
            rules: fixture_rules(),
            failing: BTreeMap::new(),
        }
    }

    /// Add a label rule; earlier rules win on overlap.
    pub fn with_rule(
        mut self,
        fragment: &str,
        sentiment: Sentiment,
        score: f64,
        confidence: f64,
    ) -> Self {
        self.rules.push(LabelRule {
            fragment: fragment.to_lowercase(),
            sentiment,
            score,
            confidence,
            reasoning: None,
            detected: None,
        });
        self
    }

    pub fn failing_batch(mut self, msg: &str) -> Self {
        self.failing.insert(Call::Batch, msg.to_string());
        self
    }

    pub fn failing_single(mut self, msg: &str) -> Self {
        self.failing.insert(Call::Single, msg.to_string());
        self
    }

    fn method(&self) -> &'static str {
        if self.credential_present {
            PAID_METHOD
        } else {
            FALLBACK_METHOD
        }
    }

    fn check(&self, call: Call) -> Result<(), CollaboratorError> {
        match self.failing.get(&call) {
            Some(msg) => Err(CollaboratorError::Fault(msg.clone())),
            None => Ok(()),
        }
    }

    fn label(&self, text: &str) -> DetailedAnalysis {
        let lower = text.to_lowercase();
        let rule = self.rules.iter().find(|r| lower.contains(&r.fragment));
        let (sentiment, score, confidence, reasoning, detected) = match rule {
            Some(r) => (
                r.sentiment,
                r.score,
                r.confidence,
                r.reasoning.clone(),
                r.detected.clone(),
            ),
            None => (Sentiment::Neutral, 0.0, 0.5, None, None),
        };
        // The fallback method has no reasoning or element detection.
        let (reasoning, detected) = if self.credential_present {
            (reasoning, detected)
        } else {
            (None, None)
        };
        DetailedAnalysis {
            original_text: text.to_string(),
            sentiment,
            score,
            confidence,
            analysis_method: self.method().to_string(),
            reasoning,
            detected_elements: detected,
        }
    }
}

fn insights_for(analyses: &[DetailedAnalysis]) -> Insights {
    let mut emoji_analysis = BTreeMap::new();
    let mut sarcasm = 0;
    for d in analyses.iter().filter_map(|a| a.detected_elements.as_ref()) {
        if d.sarcasm {
            sarcasm += 1;
        }
        if let Some(e) = &d.emoji_sentiment {
            *emoji_analysis.entry(e.clone()).or_insert(0) += 1;
        }
    }
    let negation = analyses
        .iter()
        .filter(|a| {
            let t = a.original_text.to_lowercase();
            t.contains(" not ") || t.contains("n't")
        })
        .count() as u32;
    let high = analyses
        .iter()
        .filter(|a| a.confidence >= HIGH_CONFIDENCE)
        .count() as u32;

    Insights {
        advanced_detection: Some(AdvancedDetection {
            sarcasm_detected: sarcasm,
            negation_patterns: negation,
            emoji_analysis,
        }),
        analysis_quality: Some(AnalysisQuality {
            high_confidence_analyses: high,
            chatgpt_success_rate: 1.0,
        }),
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn analyze_batch(
        &self,
        posts: &[SamplePost],
    ) -> Result<ClassificationResult, CollaboratorError> {
        self.check(Call::Batch)?;
        let analyses: Vec<DetailedAnalysis> = posts.iter().map(|p| self.label(&p.text)).collect();

        let (usage, insights) = if self.credential_present {
            let calls = analyses.len() as u32;
            (
                ApiUsage::Metered {
                    method: PAID_METHOD.to_string(),
                    estimated_cost: f64::from(calls) * COST_PER_CALL,
                    calls_made: calls,
                },
                Some(insights_for(&analyses)),
            )
        } else {
            (
                ApiUsage::Unmetered {
                    method: FALLBACK_METHOD.to_string(),
                },
                None,
            )
        };

        Ok(ClassificationResult::from_analyses(analyses, usage, insights))
    }

    async fn analyze_single(&self, text: &str) -> Result<SingleClassification, CollaboratorError> {
        self.check(Call::Single)?;
        let a = self.label(text);
        Ok(SingleClassification {
            sentiment: a.sentiment,
            score: a.score,
            confidence: a.confidence,
            analysis_method: a.analysis_method,
            reasoning: a.reasoning,
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

// ------------------------------------------------------------
// Fetcher
// ------------------------------------------------------------

pub struct StubFetcher {
    posts: BTreeMap<String, Vec<FetchedPost>>,
    failing: BTreeMap<String, String>,
}

fn canned(topic: &str, rows: &[(&str, &str, u32, u32, &str)]) -> Vec<FetchedPost> {
    rows.iter()
        .map(|(text, author, likes, rts, source)| FetchedPost {
            text: text.replace("{t}", topic),
            author_id: author.to_string(),
            public_metrics: PublicMetrics {
                like_count: *likes,
                retweet_count: *rts,
            },
            source: Some(source.to_string()),
        })
        .collect()
}

const CANNED_ROWS: &[(&str, &str, u32, u32, &str)] = &[
    ("Weekly #{t} thread: share what you shipped &amp; what broke along the way", "r_devweekly", 42, 7, "reddit"),
    ("Finally wrapped my head around #{t} packaging. Notes in the replies.", "mast_ana", 18, 4, "mastodon"),
    ("New release notes for the #{t} ecosystem are out, with a long list of fixes and a few breaking changes worth reading before upgrading", "rss_news", 0, 0, "rss"),
    ("Anyone else benchmarking #{t} tooling this week? Curious about <b>real</b> numbers", "r_bench", 9, 1, "reddit"),
    ("Small #{t} tip: read the changelog before you bump versions", "mast_tips", 31, 12, "mastodon"),
];

impl StubFetcher {
    /// Empty fetcher: every topic yields zero posts unless configured.
    pub fn empty() -> Self {
        Self {
            posts: BTreeMap::new(),
            failing: BTreeMap::new(),
        }
    }

    /// Fetcher with canned posts for the built-in fetch cases.
    pub fn with_fixture_posts() -> Self {
        let mut me = Self::empty();
        for topic in ["python", "ai", "javascript", "machinelearning"] {
            me.posts.insert(topic.to_string(), canned(topic, CANNED_ROWS));
        }
        me
    }

    pub fn with_posts(mut self, topic: &str, posts: Vec<FetchedPost>) -> Self {
        self.posts.insert(topic.to_string(), posts);
        self
    }

    pub fn failing_on(mut self, topic: &str, msg: &str) -> Self {
        self.failing.insert(topic.to_string(), msg.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(
        &self,
        topic: &str,
        count: u32,
        _method: &str,
    ) -> Result<FetchResult, CollaboratorError> {
        if let Some(msg) = self.failing.get(topic) {
            return Err(CollaboratorError::Fault(msg.clone()));
        }
        let posts = self
            .posts
            .get(topic)
            .map(|v| v.iter().take(count as usize).cloned().collect())
            .unwrap_or_default();
        Ok(FetchResult::new(posts))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_posts, SINGLE_TEXT};

    #[tokio::test]
    async fn fixture_batch_with_credential_is_metered() {
        let c = StubClassifier::new(true);
        let r = c.analyze_batch(&sample_posts()).await.unwrap();
        assert_eq!(r.statistics.total_analyzed, 4);
        assert_eq!(r.sentiment_breakdown.positive, 1);
        assert_eq!(r.sentiment_breakdown.negative, 2);
        assert_eq!(r.sentiment_breakdown.neutral, 1);
        assert!(r.api_usage.is_metered());

        let ins = r.chatgpt_insights.unwrap();
        let det = ins.advanced_detection.unwrap();
        assert_eq!(det.sarcasm_detected, 1);
        assert_eq!(det.negation_patterns, 1);
        assert_eq!(det.emoji_analysis.get("negative"), Some(&2));
    }

    #[tokio::test]
    async fn without_credential_method_degrades() {
        let c = StubClassifier::new(false);
        let r = c.analyze_batch(&sample_posts()).await.unwrap();
        assert_eq!(r.api_usage.method(), FALLBACK_METHOD);
        assert!(!r.api_usage.is_metered());
        assert!(r.chatgpt_insights.is_none());
        assert!(r.detailed_analyses.iter().all(|a| a.reasoning.is_none()));

        let s = c.analyze_single(SINGLE_TEXT).await.unwrap();
        assert_eq!(s.sentiment, Sentiment::Positive);
        assert_eq!(s.analysis_method, FALLBACK_METHOD);
    }

    #[tokio::test]
    async fn unknown_text_is_neutral_and_custom_rules_apply() {
        let c = StubClassifier::new(true).with_rule("meh", Sentiment::Negative, -0.2, 0.6);
        assert_eq!(
            c.analyze_single("plain words").await.unwrap().sentiment,
            Sentiment::Neutral
        );
        assert_eq!(
            c.analyze_single("MEH, whatever").await.unwrap().sentiment,
            Sentiment::Negative
        );
    }

    #[tokio::test]
    async fn failing_calls_raise_faults() {
        let c = StubClassifier::new(false).failing_single("quota exceeded");
        assert!(c.analyze_batch(&sample_posts()).await.is_ok());
        let err = c.analyze_single("x").await.unwrap_err();
        assert_eq!(err.kind(), "CollaboratorFault");
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn fetcher_truncates_to_count_and_tags_sources() {
        let f = StubFetcher::with_fixture_posts();
        let r = f.fetch("javascript", 3, "requests").await.unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.posts[0].text.contains("#javascript"));
        assert_eq!(
            r.source_breakdown(),
            vec![
                ("reddit".to_string(), 1),
                ("mastodon".to_string(), 1),
                ("rss".to_string(), 1)
            ]
        );
        assert!(f.fetch("rust", 5, "requests").await.unwrap().is_empty());
    }
}
