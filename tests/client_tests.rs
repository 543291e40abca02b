mod common;

use common::MockService;
use sentiment_dashboard::{
    AnalyticsClient, AnalyticsCounts, FeedbackError, FetchError, NormalizedFilter, Sentiment,
    ServiceConfig,
};
use std::time::Duration;

fn client(base_url: &str) -> AnalyticsClient {
    AnalyticsClient::new(ServiceConfig::with_base_url(base_url)).expect("client should build")
}

#[tokio::test]
async fn filtered_fetch_sends_encoded_company() {
    let service = MockService::new().with_company("acme corp", 5, 2, 1);
    let base = service.clone().spawn().await;

    let counts = client(&base)
        .fetch_analytics(&NormalizedFilter::new("  Acme Corp  "))
        .await
        .unwrap();

    assert_eq!(counts, AnalyticsCounts::new(5, 2, 1));
    assert_eq!(service.queries(), vec![Some("company=acme%20corp".to_string())]);
}

#[tokio::test]
async fn unknown_company_reads_as_zero() {
    let base = MockService::new().spawn().await;

    let counts = client(&base)
        .fetch_analytics(&NormalizedFilter::new("Initech"))
        .await
        .unwrap();
    assert_eq!(counts, AnalyticsCounts::ZERO);
}

#[tokio::test]
async fn unfiltered_request_omits_parameter() {
    let service = MockService::new()
        .with_company("acme corp", 5, 2, 1)
        .with_company("globex", 0, 3, 1);
    let base = service.clone().spawn().await;
    let client = client(&base);

    let breakdown = client.fetch_breakdown().await.unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown.totals(), AnalyticsCounts::new(5, 5, 2));
    assert_eq!(service.queries(), vec![None]);

    // The unfiltered body is a per-company map, not a count record.
    let err = client
        .fetch_analytics(&NormalizedFilter::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn missing_field_is_decode_error() {
    let service = MockService::new();
    service.force_response(200, r#"{"positive":1,"negative":2}"#);
    let base = service.spawn().await;

    let err = client(&base)
        .fetch_analytics(&NormalizedFilter::new("acme"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let service = MockService::new();
    service.force_response(200, "<html>maintenance</html>");
    let base = service.spawn().await;

    let err = client(&base)
        .fetch_analytics(&NormalizedFilter::new("acme"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn error_status_is_transport_error() {
    let service = MockService::new();
    service.force_response(500, "Internal Server Error");
    let base = service.spawn().await;

    let err = client(&base)
        .fetch_analytics(&NormalizedFilter::new("acme"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {:?}", err);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let err = client("http://127.0.0.1:1")
        .fetch_analytics(&NormalizedFilter::new("acme"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn configured_timeout_is_transport_error() {
    let service = MockService::new().with_company("slow co", 1, 1, 1);
    service.delay("slow co", Duration::from_secs(3));
    let base = service.spawn().await;

    let config = ServiceConfig {
        request_timeout_secs: Some(1),
        ..ServiceConfig::with_base_url(&base)
    };
    let client = AnalyticsClient::new(config).unwrap();

    let err = client
        .fetch_analytics(&NormalizedFilter::new("Slow Co"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn submit_feedback_updates_counts() {
    let service = MockService::new();
    let base = service.clone().spawn().await;
    let client = client(&base);

    let outcome = client
        .submit_feedback("  Acme Corp ", "Delivery was late again")
        .await
        .unwrap();
    assert_eq!(outcome.company, "acme corp");
    assert_eq!(outcome.sentiment, Sentiment::Negative);
    assert_eq!(outcome.tag, "poor service");
    assert!(!outcome.alert_sent);

    let counts = client
        .fetch_analytics(&NormalizedFilter::new("Acme Corp"))
        .await
        .unwrap();
    assert_eq!(counts, AnalyticsCounts::new(0, 1, 0));
    assert_eq!(service.record("acme corp").unwrap()["tags"][0], "poor service");
}

#[tokio::test]
async fn alert_reported_at_threshold() {
    let service = MockService::new().with_company("acme", 0, 4, 0);
    let base = service.spawn().await;

    let outcome = client(&base)
        .submit_feedback("Acme", "Staff were rude")
        .await
        .unwrap();
    assert!(outcome.alert_sent);
}

#[tokio::test]
async fn api_error_carries_detail() {
    let service = MockService::new();
    service.force_response(400, r#"{"detail":"Feedback cannot be empty or just spaces"}"#);
    let base = service.spawn().await;

    let err = client(&base)
        .submit_feedback("Acme", "fine")
        .await
        .unwrap_err();
    match err {
        FeedbackError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Feedback cannot be empty or just spaces");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn reset_zeroes_company() {
    let service = MockService::new().with_company("acme corp", 5, 2, 1);
    let base = service.spawn().await;
    let client = client(&base);

    let counts = client.reset_company(" ACME Corp ").await.unwrap();
    assert_eq!(counts, AnalyticsCounts::ZERO);

    let counts = client
        .fetch_analytics(&NormalizedFilter::new("acme corp"))
        .await
        .unwrap();
    assert_eq!(counts, AnalyticsCounts::ZERO);
}
