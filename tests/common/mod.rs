//! In-process mock of the feedback aggregation service.

#![allow(dead_code)]

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Negative count at which the service reports an alert
const ALERT_THRESHOLD: u64 = 5;

#[derive(Default)]
struct Inner {
    data: BTreeMap<String, Value>,
    /// Raw query string of every analytics request, in arrival order
    queries: Vec<Option<String>>,
    /// Forced status and raw body for every endpoint
    forced: Option<(u16, String)>,
    /// Per-company response delay
    delays: HashMap<String, Duration>,
}

#[derive(Clone, Default)]
pub struct MockService {
    inner: Arc<Mutex<Inner>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company(self, company: &str, positive: u64, negative: u64, neutral: u64) -> Self {
        self.inner.lock().unwrap().data.insert(
            company.to_string(),
            json!({
                "positive": positive,
                "negative": negative,
                "neutral": neutral,
                "tags": [],
            }),
        );
        self
    }

    pub fn delay(&self, company: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .delays
            .insert(company.to_string(), delay);
    }

    pub fn force_response(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().forced = Some((status, body.to_string()));
    }

    pub fn clear_forced(&self) {
        self.inner.lock().unwrap().forced = None;
    }

    pub fn queries(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().queries.clone()
    }

    pub fn record(&self, company: &str) -> Option<Value> {
        self.inner.lock().unwrap().data.get(company).cloned()
    }

    /// Bind to an ephemeral port and return the base URL
    pub async fn spawn(self) -> String {
        let router = Router::new()
            .route("/analytics/", get(analytics))
            .route("/classify/", post(classify))
            .route("/reset/", post(reset))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn forced(&self) -> Option<Response> {
        self.inner.lock().unwrap().forced.clone().map(|(status, body)| {
            (StatusCode::from_u16(status).unwrap(), body).into_response()
        })
    }
}

fn zero_record() -> Value {
    json!({"positive": 0, "negative": 0, "neutral": 0, "tags": []})
}

async fn analytics(
    State(service): State<MockService>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let company = params
        .get("company")
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    let (delay, body) = {
        let mut inner = service.inner.lock().unwrap();
        inner.queries.push(raw);

        match &company {
            Some(company) => (
                inner.delays.get(company).copied(),
                inner.data.get(company).cloned().unwrap_or_else(zero_record),
            ),
            None => (None, json!(inner.data)),
        }
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(forced) = service.forced() {
        return forced;
    }

    Json(body).into_response()
}

async fn classify(State(service): State<MockService>, Json(request): Json<Value>) -> Response {
    if let Some(forced) = service.forced() {
        return forced;
    }

    let company = request["company"]
        .as_str()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let feedback = request["feedback"].as_str().unwrap_or_default().to_lowercase();
    if company.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Company name cannot be empty"})),
        )
            .into_response();
    }

    let (sentiment, tag) = if feedback.contains("late") || feedback.contains("rude") {
        ("negative", "poor service")
    } else if feedback.contains("ok") {
        ("neutral", "average")
    } else {
        ("positive", "great experience")
    };

    let mut inner = service.inner.lock().unwrap();
    let record = inner.data.entry(company.clone()).or_insert_with(zero_record);
    let count = record[sentiment].as_u64().unwrap_or(0) + 1;
    record[sentiment] = json!(count);
    record["tags"].as_array_mut().unwrap().push(json!(tag));
    let alert = record["negative"].as_u64().unwrap_or(0) >= ALERT_THRESHOLD;

    Json(json!({
        "company": company,
        "sentiment": sentiment,
        "tag": tag,
        "alertSent": alert,
    }))
    .into_response()
}

async fn reset(
    State(service): State<MockService>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(forced) = service.forced() {
        return forced;
    }

    let company = params
        .get("company")
        .map(|c| c.trim().to_lowercase())
        .unwrap_or_default();
    if company.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Company name cannot be empty"})),
        )
            .into_response();
    }

    let mut inner = service.inner.lock().unwrap();
    inner.data.insert(company.clone(), zero_record());

    Json(json!({
        "message": format!("Analytics for {} have been reset.", company),
        "data": zero_record(),
    }))
    .into_response()
}
