// src/sentiment.rs
//! Classification records consumed from the sentiment collaborator.
//!
//! The wire shape mirrors the backend's JSON; conditionally present parts
//! (metered usage, insights) are modelled as enums/options instead of loose maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Method name reported by the paid (metered) backend.
pub const PAID_METHOD: &str = "chatgpt";

/// Samples kept per category by [`ClassificationResult::from_analyses`].
pub const SAMPLES_PER_CATEGORY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Fixed reporting order.
    pub const ALL: [Sentiment; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per sentiment category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSentiment<T> {
    #[serde(default)]
    pub positive: T,
    #[serde(default)]
    pub negative: T,
    #[serde(default)]
    pub neutral: T,
}

impl<T> PerSentiment<T> {
    pub fn get(&self, s: Sentiment) -> &T {
        match s {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
            Sentiment::Neutral => &self.neutral,
        }
    }

    pub fn get_mut(&mut self, s: Sentiment) -> &mut T {
        match s {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
            Sentiment::Neutral => &mut self.neutral,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_analyzed: u32,
    #[serde(default)]
    pub average_confidence: f64,
}

/// Backend usage. Cost and call count exist only for the metered backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawApiUsage", into = "RawApiUsage")]
pub enum ApiUsage {
    Metered {
        method: String,
        estimated_cost: f64,
        calls_made: u32,
    },
    Unmetered {
        method: String,
    },
}

impl ApiUsage {
    pub fn method(&self) -> &str {
        match self {
            Self::Metered { method, .. } | Self::Unmetered { method } => method,
        }
    }

    pub fn is_metered(&self) -> bool {
        matches!(self, Self::Metered { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawApiUsage {
    analysis_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    estimated_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calls_made: Option<u32>,
}

impl From<RawApiUsage> for ApiUsage {
    fn from(raw: RawApiUsage) -> Self {
        if raw.analysis_method == PAID_METHOD {
            ApiUsage::Metered {
                method: raw.analysis_method,
                estimated_cost: raw.estimated_cost.unwrap_or(0.0),
                calls_made: raw.calls_made.unwrap_or(0),
            }
        } else {
            ApiUsage::Unmetered {
                method: raw.analysis_method,
            }
        }
    }
}

impl From<ApiUsage> for RawApiUsage {
    fn from(u: ApiUsage) -> Self {
        match u {
            ApiUsage::Metered {
                method,
                estimated_cost,
                calls_made,
            } => RawApiUsage {
                analysis_method: method,
                estimated_cost: Some(estimated_cost),
                calls_made: Some(calls_made),
            },
            ApiUsage::Unmetered { method } => RawApiUsage {
                analysis_method: method,
                estimated_cost: None,
                calls_made: None,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedElements {
    #[serde(default)]
    pub sarcasm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_sentiment: Option<String>,
}

impl DetectedElements {
    pub fn is_empty(&self) -> bool {
        !self.sarcasm && self.emoji_sentiment.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTweet {
    pub text: String,
    pub score: f64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_elements: Option<DetectedElements>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedDetection {
    #[serde(default)]
    pub sarcasm_detected: u32,
    #[serde(default)]
    pub negation_patterns: u32,
    #[serde(default)]
    pub emoji_analysis: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisQuality {
    #[serde(default)]
    pub high_confidence_analyses: u32,
    /// Fraction in 0.0..=1.0.
    #[serde(default)]
    pub chatgpt_success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_detection: Option<AdvancedDetection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_quality: Option<AnalysisQuality>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.advanced_detection.is_none() && self.analysis_quality.is_none()
    }
}

/// Per-item analysis as reported in `detailed_analyses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub original_text: String,
    pub sentiment: Sentiment,
    pub score: f64,
    pub confidence: f64,
    pub analysis_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_elements: Option<DetectedElements>,
}

/// Result of a batch classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub statistics: Statistics,
    pub api_usage: ApiUsage,
    pub sentiment_breakdown: PerSentiment<u32>,
    pub sentiment_percentages: PerSentiment<f64>,
    #[serde(default)]
    pub sample_tweets: PerSentiment<Vec<SampleTweet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chatgpt_insights: Option<Insights>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detailed_analyses: Vec<DetailedAnalysis>,
}

/// Result of classifying one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleClassification {
    pub sentiment: Sentiment,
    pub score: f64,
    pub confidence: f64,
    pub analysis_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

impl ClassificationResult {
    /// Build a self-consistent result from per-item analyses.
    pub fn from_analyses(
        analyses: Vec<DetailedAnalysis>,
        api_usage: ApiUsage,
        chatgpt_insights: Option<Insights>,
    ) -> Self {
        let total = analyses.len() as u32;
        let mut breakdown = PerSentiment::<u32>::default();
        let mut samples = PerSentiment::<Vec<SampleTweet>>::default();
        let mut conf_sum = 0.0;

        for a in &analyses {
            *breakdown.get_mut(a.sentiment) += 1;
            conf_sum += a.confidence;
            let bucket = samples.get_mut(a.sentiment);
            if bucket.len() < SAMPLES_PER_CATEGORY {
                bucket.push(SampleTweet {
                    text: a.original_text.clone(),
                    score: a.score,
                    confidence: a.confidence,
                    reasoning: a.reasoning.clone(),
                    detected_elements: a.detected_elements.clone(),
                });
            }
        }

        let pct = |n: u32| {
            if total == 0 {
                0.0
            } else {
                round1(100.0 * f64::from(n) / f64::from(total))
            }
        };
        let percentages = PerSentiment {
            positive: pct(breakdown.positive),
            negative: pct(breakdown.negative),
            neutral: pct(breakdown.neutral),
        };
        let average_confidence = if total == 0 {
            0.0
        } else {
            conf_sum / f64::from(total)
        };

        Self {
            statistics: Statistics {
                total_analyzed: total,
                average_confidence,
            },
            api_usage,
            sentiment_breakdown: breakdown,
            sentiment_percentages: percentages,
            sample_tweets: samples,
            chatgpt_insights,
            detailed_analyses: analyses,
        }
    }

    /// positive + negative + neutral == total_analyzed
    pub fn breakdown_matches_total(&self) -> bool {
        let b = &self.sentiment_breakdown;
        u64::from(b.positive) + u64::from(b.negative) + u64::from(b.neutral)
            == u64::from(self.statistics.total_analyzed)
    }

    /// Percentages sum to 100 within rounding; all zero for an empty batch.
    pub fn percentages_within_tolerance(&self) -> bool {
        let p = &self.sentiment_percentages;
        let sum = p.positive + p.negative + p.neutral;
        if self.statistics.total_analyzed == 0 {
            return sum == 0.0;
        }
        (99.0..=101.0).contains(&sum.round())
    }
}
