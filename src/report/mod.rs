// src/report/mod.rs
//! Human-readable rendering of collaborator results.
//!
//! Every renderer is pure: same input, same text. Elapsed time is passed in
//! by the caller rather than measured here.

pub mod text;

use std::time::Duration;

use crate::config::ReportConfig;
use crate::fetch::FetchResult;
use crate::fixtures::FetchCase;
use crate::sentiment::{ApiUsage, ClassificationResult, Sentiment, SingleClassification};

pub use text::{normalize, preview, truncate};

/// Samples shown per category and detailed analyses shown overall.
pub const SAMPLES_SHOWN: usize = 2;
/// Posts previewed per fetch result.
pub const FETCH_PREVIEW: usize = 3;

pub const RULE: &str = "============================================================";

fn title_case(s: Sentiment) -> &'static str {
    match s {
        Sentiment::Positive => "Positive",
        Sentiment::Negative => "Negative",
        Sentiment::Neutral => "Neutral",
    }
}

/// Notice printed once before any case runs.
pub fn render_credential_notice(present: bool, var: &str) -> String {
    if present {
        format!("{var} found - paid analysis enabled")
    } else {
        [
            format!("WARNING: {var} not found in environment"),
            "   The classifier will fall back to its non-AI method".to_string(),
            format!("   Set {var} (or add it to .env) for full analysis"),
        ]
        .join("\n")
    }
}

pub fn render_classification(r: &ClassificationResult, opts: &ReportConfig) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push("RESULTS:".into());
    out.push(format!("Total analyzed: {}", r.statistics.total_analyzed));
    out.push(format!(
        "Average confidence: {:.2}",
        r.statistics.average_confidence
    ));
    out.push(format!("Analysis method: {}", r.api_usage.method()));
    if let ApiUsage::Metered {
        estimated_cost,
        calls_made,
        ..
    } = &r.api_usage
    {
        out.push(format!("Estimated cost: ${estimated_cost:.4}"));
        out.push(format!("API calls made: {calls_made}"));
    }

    out.push(String::new());
    out.push("Sentiment Breakdown:".into());
    for s in Sentiment::ALL {
        // Pad so the counts line up ("Neutral:" is one char shorter).
        let label = format!("{}:", title_case(s));
        out.push(format!(
            "  {label:<9} {} tweets ({:.1}%)",
            r.sentiment_breakdown.get(s),
            r.sentiment_percentages.get(s)
        ));
    }

    out.push(String::new());
    out.push("Sample Results:".into());
    for s in Sentiment::ALL {
        let samples = r.sample_tweets.get(s);
        if samples.is_empty() {
            continue;
        }
        out.push(String::new());
        out.push(format!("{} Examples:", s.as_str().to_uppercase()));
        for sample in samples.iter().take(SAMPLES_SHOWN) {
            out.push(format!(
                "  - \"{}\"",
                preview(&sample.text, opts.sample_chars)
            ));
            out.push(format!(
                "    Score: {:.2}, Confidence: {:.2}",
                sample.score, sample.confidence
            ));
            if let Some(reason) = sample.reasoning.as_deref().filter(|s| !s.is_empty()) {
                out.push(format!("    Reasoning: {reason}"));
            }
            if let Some(el) = &sample.detected_elements {
                if el.sarcasm {
                    out.push("    Sarcasm detected!".into());
                }
                if let Some(e) = &el.emoji_sentiment {
                    out.push(format!("    Emoji sentiment: {e}"));
                }
            }
        }
    }

    if let Some(ins) = r.chatgpt_insights.as_ref().filter(|i| !i.is_empty()) {
        out.push(String::new());
        out.push("Insights:".into());
        if let Some(d) = &ins.advanced_detection {
            out.push(format!("  Sarcasm detected: {} tweets", d.sarcasm_detected));
            out.push(format!("  Negation patterns: {} tweets", d.negation_patterns));
            if d.emoji_analysis.values().any(|&n| n > 0) {
                let parts: Vec<String> = d
                    .emoji_analysis
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                out.push(format!("  Emoji analysis: {}", parts.join(", ")));
            }
        }
        if let Some(q) = &ins.analysis_quality {
            out.push(format!(
                "  High confidence analyses: {}",
                q.high_confidence_analyses
            ));
            out.push(format!(
                "  Success rate: {:.1}%",
                q.chatgpt_success_rate * 100.0
            ));
        }
    }

    if !r.detailed_analyses.is_empty() {
        out.push(String::new());
        out.push("Detailed Analysis:".into());
        for a in r.detailed_analyses.iter().take(SAMPLES_SHOWN) {
            out.push(String::new());
            out.push(format!(
                "Tweet: \"{}\"",
                preview(&a.original_text, opts.detail_chars)
            ));
            out.push(format!("  Sentiment: {}", a.sentiment));
            out.push(format!("  Score: {:.2}", a.score));
            out.push(format!("  Confidence: {:.2}", a.confidence));
            out.push(format!("  Method: {}", a.analysis_method));
            if let Some(reason) = a.reasoning.as_deref().filter(|s| !s.is_empty()) {
                out.push(format!("  Reasoning: {reason}"));
            }
        }
    }

    out.join("\n")
}

pub fn render_single(r: &SingleClassification) -> String {
    let mut out = vec![
        format!("Sentiment: {}", r.sentiment),
        format!("Score: {:.2}", r.score),
        format!("Confidence: {:.2}", r.confidence),
        format!("Method: {}", r.analysis_method),
    ];
    if let Some(reason) = r.reasoning.as_deref().filter(|s| !s.is_empty()) {
        out.push(format!("Reasoning: {reason}"));
    }
    out.join("\n")
}

/// Banner printed before each fetch case.
pub fn render_fetch_header(case: &FetchCase) -> String {
    format!(
        "{RULE}\nTesting #{} with {} method ({} tweets)\n{RULE}",
        case.topic, case.method, case.count
    )
}

pub fn render_fetch(r: &FetchResult, elapsed: Duration, opts: &ReportConfig) -> String {
    let mut out = vec![
        "RESULTS:".to_string(),
        format!("   Time taken: {:.2} seconds", elapsed.as_secs_f64()),
        format!("   Tweets found: {}", r.len()),
    ];

    if r.is_empty() {
        out.push("   No tweets found".into());
        return out.join("\n");
    }

    out.push("   Data sources:".into());
    for (source, n) in r.source_breakdown() {
        out.push(format!("      - {source}: {n} tweets"));
    }

    out.push(String::new());
    out.push("Sample tweets:".into());
    for (i, p) in r.posts.iter().take(FETCH_PREVIEW).enumerate() {
        out.push(format!("   {}. {}", i + 1, preview(&p.text, opts.preview_chars)));
        out.push(format!("      Author: {}", p.author_id));
        out.push(format!("      Likes: {}", p.public_metrics.like_count));
        out.push(format!("      Retweets: {}", p.public_metrics.retweet_count));
        out.push(format!("      Source: {}", p.source()));
    }

    out.join("\n")
}
