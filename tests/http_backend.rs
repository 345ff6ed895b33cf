// tests/http_backend.rs
//
// HTTP collaborators against an in-process Axum backend on an ephemeral port.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use collab_check::collaborator::{Classifier, Fetcher, HttpClassifier, HttpFetcher};
use collab_check::config::ReportConfig;
use collab_check::fixtures::{sample_posts, FetchCase};
use collab_check::runner::run_fetch_suite;
use collab_check::sentiment::Sentiment;

async fn batch(Json(body): Json<Value>) -> Response {
    let tweets = body["tweets"].as_array().cloned().unwrap_or_default();
    // Fixture timestamps must arrive as RFC 3339.
    if tweets.iter().any(|t| t["created_at"].as_str().is_none()) {
        return (StatusCode::BAD_REQUEST, "created_at missing").into_response();
    }
    let n = tweets.len();
    Json(json!({
        "statistics": {"total_analyzed": n, "average_confidence": 0.7},
        "api_usage": {"analysis_method": "textblob"},
        "sentiment_breakdown": {"positive": n, "negative": 0, "neutral": 0},
        "sentiment_percentages": {"positive": 100.0, "negative": 0.0, "neutral": 0.0},
        "sample_tweets": {"positive": [], "negative": [], "neutral": []}
    }))
    .into_response()
}

async fn single(Json(body): Json<Value>) -> Response {
    if body["text"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "empty text").into_response();
    }
    Json(json!({
        "sentiment": "negative",
        "score": -0.4,
        "confidence": 0.6,
        "analysis_method": "textblob"
    }))
    .into_response()
}

async fn tweets(Query(q): Query<HashMap<String, String>>) -> Response {
    match q.get("hashtag").map(String::as_str) {
        Some("down") => (StatusCode::SERVICE_UNAVAILABLE, "blocked").into_response(),
        Some("garbage") => "<html>nope</html>".into_response(),
        Some(tag) => {
            let count: usize = q.get("count").and_then(|c| c.parse().ok()).unwrap_or(0);
            let posts: Vec<Value> = (0..count)
                .map(|i| {
                    json!({
                        "text": format!("#{tag} post {i}"),
                        "author_id": format!("u{i}"),
                        "public_metrics": {"like_count": i, "retweet_count": 0},
                        "source": "reddit"
                    })
                })
                .collect();
            Json(Value::Array(posts)).into_response()
        }
        None => (StatusCode::BAD_REQUEST, "hashtag required").into_response(),
    }
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/sentiment/batch", post(batch))
        .route("/api/sentiment/analyze", post(single))
        .route("/api/tweets", get(tweets));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn classifier_round_trips_batch_and_single() {
    let base = spawn_backend().await;
    let c = HttpClassifier::new(&base, Duration::from_secs(5)).unwrap();

    let r = c.analyze_batch(&sample_posts()).await.unwrap();
    assert_eq!(r.statistics.total_analyzed, 4);
    assert_eq!(r.api_usage.method(), "textblob");
    assert!(!r.api_usage.is_metered());

    let s = c.analyze_single("meh").await.unwrap();
    assert_eq!(s.sentiment, Sentiment::Negative);

    let err = c.analyze_single("").await.unwrap_err();
    assert_eq!(err.kind(), "StatusError");
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn fetcher_maps_status_and_decode_failures() {
    let base = spawn_backend().await;
    let f = HttpFetcher::new(&base, Duration::from_secs(5)).unwrap();

    let ok = f.fetch("rust", 2, "requests").await.unwrap();
    assert_eq!(ok.len(), 2);
    assert_eq!(ok.posts[1].source(), "reddit");

    let down = f.fetch("down", 2, "requests").await.unwrap_err();
    assert_eq!(down.kind(), "StatusError");
    assert_eq!(down.to_string(), "backend returned HTTP 503: blocked");

    let garbage = f.fetch("garbage", 2, "requests").await.unwrap_err();
    assert_eq!(garbage.kind(), "DecodeError");
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_fault() {
    // Port 9 (discard) is almost never listening locally.
    let f = HttpFetcher::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = f.fetch("python", 1, "requests").await.unwrap_err();
    assert_eq!(err.kind(), "TransportError");
}

#[tokio::test]
async fn suite_over_http_isolates_failing_case() {
    let base = spawn_backend().await;
    let f = HttpFetcher::new(&base, Duration::from_secs(5)).unwrap();
    let cases = [
        FetchCase {
            topic: "python",
            count: 2,
            method: "requests",
        },
        FetchCase {
            topic: "down",
            count: 2,
            method: "requests",
        },
        FetchCase {
            topic: "ai",
            count: 1,
            method: "requests",
        },
    ];

    let mut buf = Vec::new();
    let summary = run_fetch_suite(&f, &cases, &ReportConfig::default(), &mut buf)
        .await
        .unwrap();
    let out = String::from_utf8(buf).unwrap();

    assert_eq!((summary.successful, summary.total), (2, 3));
    assert!(!summary.all_completed);
    assert!(out.contains("FAILED #down: backend returned HTTP 503: blocked (StatusError)"));
    assert!(out.contains("   #ai: 1 items - PASSED"));
}
