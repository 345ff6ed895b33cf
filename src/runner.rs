// src/runner.rs
//! Suite drivers: build fixtures -> invoke -> report -> aggregate.
//!
//! Cases run strictly one after another. A fault is caught at the case
//! boundary, recorded, and the next case still runs.

use std::future::Future;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::collaborator::{
    Classifier, Fetcher, HttpClassifier, HttpFetcher, StubClassifier, StubFetcher,
};
use crate::config::{has_credential, HarnessConfig, ReportConfig};
use crate::error::CollaboratorError;
use crate::fixtures::{fetch_cases, sample_posts, FetchCase, SINGLE_TEXT};
use crate::report::{self, RULE};
use crate::summary::{Fault, Suite, SuiteError, Summary, TestCaseOutcome};

pub const SENTIMENT_SUITE: &str = "sentiment";
pub const FETCH_SUITE: &str = "fetch";

/// Which collaborators a run talks to.
pub struct Collaborators {
    pub classifier: Box<dyn Classifier>,
    pub fetcher: Box<dyn Fetcher>,
}

impl Collaborators {
    /// HTTP collaborators when a backend URL is configured and `offline` is off;
    /// otherwise the deterministic stubs.
    pub fn select(
        cfg: &HarnessConfig,
        offline: bool,
        credential_present: bool,
    ) -> Result<Self, CollaboratorError> {
        match cfg.backend_url.as_deref() {
            Some(url) if !offline => {
                tracing::info!(backend = url, "using HTTP collaborators");
                Ok(Self {
                    classifier: Box::new(HttpClassifier::new(url, cfg.timeout())?),
                    fetcher: Box::new(HttpFetcher::new(url, cfg.timeout())?),
                })
            }
            _ => {
                tracing::info!(offline, "using stub collaborators");
                Ok(Self {
                    classifier: Box::new(StubClassifier::new(credential_present)),
                    fetcher: Box::new(StubFetcher::with_fixture_posts()),
                })
            }
        }
    }
}

/// Check the credential once and render the notice. Never fails.
pub fn preflight<F>(cfg: &HarnessConfig, lookup: F) -> (bool, String)
where
    F: Fn(&str) -> Option<String>,
{
    let present = has_credential(&cfg.credential_env, lookup);
    if !present {
        tracing::warn!(var = %cfg.credential_env, "credential missing; collaborator will degrade");
    }
    (present, report::render_credential_notice(present, &cfg.credential_env))
}

async fn timed<T, Fut>(fut: Fut) -> (T, Duration)
where
    Fut: Future<Output = T>,
{
    let t0 = Instant::now();
    let out = fut.await;
    (out, t0.elapsed())
}

fn suite_err(e: SuiteError) -> io::Error {
    io::Error::other(e)
}

fn record_fault<W: Write>(
    out: &mut W,
    suite: &mut Suite,
    case_id: &str,
    err: &CollaboratorError,
    elapsed: Duration,
) -> io::Result<()> {
    tracing::warn!(suite = suite.name(), case = case_id, kind = err.kind(), error = %err, "case faulted");
    let outcome = TestCaseOutcome::faulted(case_id, Fault::from(err), elapsed);
    if let Some(line) = outcome.diagnostic() {
        writeln!(out, "{line}")?;
    }
    suite.finish(outcome).map_err(suite_err)
}

/// Batch case + single-text case against the classifier.
pub async fn run_sentiment_suite<W: Write>(
    classifier: &dyn Classifier,
    opts: &ReportConfig,
    out: &mut W,
) -> io::Result<Summary> {
    let mut suite = Suite::new(SENTIMENT_SUITE);
    let posts = sample_posts();

    writeln!(out, "Testing sentiment analysis ({})", classifier.name())?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Analyzing {} sample tweets...", posts.len())?;
    writeln!(out)?;
    writeln!(out, "Sample tweets:")?;
    for (i, p) in posts.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, p.text)?;
    }
    writeln!(out)?;
    writeln!(out, "{RULE}")?;

    // -- batch
    suite.begin("batch").map_err(suite_err)?;
    let (res, elapsed) = timed(classifier.analyze_batch(&posts)).await;
    match res {
        Ok(r) => {
            writeln!(out, "{}", report::render_classification(&r, opts))?;
            let consistent = r.breakdown_matches_total() && r.percentages_within_tolerance();
            if !consistent {
                tracing::warn!("classification counts inconsistent with total");
                writeln!(
                    out,
                    "WARNING: breakdown/percentages inconsistent with total analyzed"
                )?;
            }
            let observed = r.statistics.total_analyzed as usize;
            suite
                .finish(TestCaseOutcome::completed("batch", consistent, observed, elapsed))
                .map_err(suite_err)?;
        }
        Err(e) => record_fault(out, &mut suite, "batch", &e, elapsed)?,
    }

    // -- single
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Testing single tweet analysis")?;
    writeln!(out, "Tweet: {SINGLE_TEXT}")?;
    suite.begin("single").map_err(suite_err)?;
    let (res, elapsed) = timed(classifier.analyze_single(SINGLE_TEXT)).await;
    match res {
        Ok(r) => {
            writeln!(out, "{}", report::render_single(&r))?;
            suite
                .finish(TestCaseOutcome::completed("single", true, 1, elapsed))
                .map_err(suite_err)?;
        }
        Err(e) => record_fault(out, &mut suite, "single", &e, elapsed)?,
    }

    let summary = suite.summarize();
    writeln!(out)?;
    writeln!(out, "{}", summary.render())?;
    Ok(summary)
}

/// One fetch per case. Zero posts is a failed tally, not a fault.
pub async fn run_fetch_suite<W: Write>(
    fetcher: &dyn Fetcher,
    cases: &[FetchCase],
    opts: &ReportConfig,
    out: &mut W,
) -> io::Result<Summary> {
    let mut suite = Suite::new(FETCH_SUITE);
    writeln!(out, "Testing tweet fetch ({})", fetcher.name())?;

    for case in cases {
        let id = case.case_id();
        writeln!(out)?;
        writeln!(out, "{}", report::render_fetch_header(case))?;

        suite.begin(&id).map_err(suite_err)?;
        let (res, elapsed) = timed(fetcher.fetch(case.topic, case.count, case.method)).await;
        match res {
            Ok(r) => {
                writeln!(out, "{}", report::render_fetch(&r, elapsed, opts))?;
                suite
                    .finish(TestCaseOutcome::completed(&id, !r.is_empty(), r.len(), elapsed))
                    .map_err(suite_err)?;
            }
            Err(e) => record_fault(out, &mut suite, &id, &e, elapsed)?,
        }
    }

    let summary = suite.summarize();
    writeln!(out)?;
    writeln!(out, "{}", summary.render())?;
    Ok(summary)
}

/// Fetch suite over the built-in cases.
pub async fn run_default_fetch_suite<W: Write>(
    fetcher: &dyn Fetcher,
    opts: &ReportConfig,
    out: &mut W,
) -> io::Result<Summary> {
    run_fetch_suite(fetcher, &fetch_cases(), opts, out).await
}

/// All passed iff every invocation in every suite completed without a fault.
pub fn overall_passed(summaries: &[Summary]) -> bool {
    summaries.iter().all(|s| s.all_completed)
}

pub fn render_verdict(summaries: &[Summary]) -> String {
    let mut out = vec![RULE.to_string(), "TEST SUMMARY:".to_string()];
    for s in summaries {
        out.push(format!(
            "{}: {}/{} successful, {}",
            s.suite,
            s.successful,
            s.total,
            if s.all_completed {
                "completed without faults"
            } else {
                "raised faults"
            }
        ));
    }
    out.push(String::new());
    out.push(if overall_passed(summaries) {
        "All suites completed without faults.".to_string()
    } else {
        "Some cases raised faults. Check the messages above.".to_string()
    });
    out.join("\n")
}
