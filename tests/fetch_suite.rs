// tests/fetch_suite.rs
//
// Fetch suite against the stub fetcher: tally shape, empty results, fault isolation.

use collab_check::collaborator::{Fetcher, StubFetcher};
use collab_check::config::ReportConfig;
use collab_check::fetch::{FetchedPost, PublicMetrics};
use collab_check::fixtures::{fetch_cases, FetchCase};
use collab_check::runner::{render_verdict, run_default_fetch_suite, run_fetch_suite};
use collab_check::{success_rate, Summary};

async fn run_default(fetcher: &dyn Fetcher) -> (Summary, String) {
    let mut buf: Vec<u8> = Vec::new();
    let s = run_default_fetch_suite(fetcher, &ReportConfig::default(), &mut buf)
        .await
        .unwrap();
    (s, String::from_utf8(buf).unwrap())
}

#[tokio::test]
async fn four_cases_give_four_tally_lines_and_one_aggregate() {
    let f = StubFetcher::with_fixture_posts().with_posts("machinelearning", Vec::new());
    let (summary, out) = run_default(&f).await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.lines.len(), 5);
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.success_rate, summary.successful as f64 / 4.0);
    assert!(summary.lines[4].contains("3/4 successful"));
    assert!(summary.lines[4].contains("success rate 75.0%"));
    assert_eq!(summary.items_observed, 5 + 5 + 3);

    assert!(out.contains("Testing #python with requests method (5 tweets)"));
    assert!(out.contains("   #machinelearning: 0 items - FAILED"));
    assert!(out.contains("No tweets found"));
}

#[tokio::test]
async fn empty_fetch_fails_tally_without_fault() {
    let (summary, _out) = run_default(&StubFetcher::empty()).await;

    assert_eq!(summary.successful, 0);
    assert_eq!(summary.success_rate, 0.0);
    // nothing raised, so the run itself completed
    assert!(summary.all_completed);
    assert!(render_verdict(&[summary])
        .contains("fetch: 0/4 successful, completed without faults"));
}

#[tokio::test]
async fn fault_on_one_case_keeps_the_rest_running() {
    let f = StubFetcher::with_fixture_posts().failing_on("ai", "blocked by upstream");
    let (summary, out) = run_default(&f).await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.successful, 3);
    assert!(!summary.all_completed);
    assert!(out.contains("FAILED #ai: blocked by upstream (CollaboratorFault)"));
    assert!(out.contains("   #javascript: 3 items - PASSED"));
    assert!(out.contains("   #machinelearning: 3 items - PASSED"));
}

#[tokio::test]
async fn previews_are_bounded_and_normalized() {
    let long = FetchedPost {
        text: format!("Q&amp;A <i>session</i>\n\n{}", "lorem ipsum ".repeat(40)),
        author_id: "verbose".into(),
        public_metrics: PublicMetrics {
            like_count: 1,
            retweet_count: 2,
        },
        source: Some("rss".into()),
    };
    let f = StubFetcher::empty().with_posts("long", vec![long]);
    let cases = [FetchCase {
        topic: "long",
        count: 1,
        method: "requests",
    }];
    let opts = ReportConfig {
        preview_chars: 40,
        ..ReportConfig::default()
    };

    let mut buf = Vec::new();
    run_fetch_suite(&f, &cases, &opts, &mut buf).await.unwrap();
    let out = String::from_utf8(buf).unwrap();

    let line = out
        .lines()
        .find(|l| l.trim_start().starts_with("1. "))
        .expect("preview line");
    assert!(line.contains("1. Q&A session lorem"));
    assert!(line.ends_with("..."));
    assert!(line.trim_start().chars().count() <= "1. ".len() + 40 + 3);
}

#[test]
fn rate_matches_outcomes() {
    assert_eq!(fetch_cases().len(), 4);
    assert_eq!(success_rate(&[]), 0.0);
}
