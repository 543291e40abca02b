//! Aggregation Service REST Client
//!
//! HTTP client for the feedback aggregation service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::error::{FeedbackError, FetchError};
use super::types::{
    AnalyticsCounts, ClassifyOutcome, CompanyAnalytics, CompanyBreakdown, NormalizedFilter,
};
use crate::config::ServiceConfig;

/// Anything the dashboard can fetch counts from
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Fetch the tally for a filter; the empty filter asks for global analytics
    async fn fetch_analytics(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<AnalyticsCounts, FetchError>;
}

/// REST client for the aggregation service
pub struct AnalyticsClient {
    client: Client,
    base_url: String,
}

impl AnalyticsClient {
    /// Create a client for the configured service
    pub fn new(config: ServiceConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request target for a filter
    ///
    /// The company parameter is omitted entirely for the empty filter.
    pub fn analytics_url(&self, filter: &NormalizedFilter) -> String {
        if filter.is_empty() {
            format!("{}/analytics/", self.base_url)
        } else {
            format!(
                "{}/analytics/?company={}",
                self.base_url,
                urlencoding::encode(filter.as_str())
            )
        }
    }

    /// Fetch counts for one filter. One request, no retries.
    pub async fn fetch_analytics(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<AnalyticsCounts, FetchError> {
        let url = self.analytics_url(filter);
        tracing::debug!(%url, "Fetching analytics");

        let response = self.client.get(&url).send().await?;
        decode_success(response).await
    }

    /// Fetch the per-company breakdown the service returns when unfiltered
    pub async fn fetch_breakdown(&self) -> Result<CompanyBreakdown, FetchError> {
        let url = self.analytics_url(&NormalizedFilter::default());
        tracing::debug!(%url, "Fetching company breakdown");

        let response = self.client.get(&url).send().await?;
        decode_success(response).await
    }

    /// Submit one piece of feedback for classification
    pub async fn submit_feedback(
        &self,
        company: &str,
        feedback: &str,
    ) -> Result<ClassifyOutcome, FeedbackError> {
        let company = company.trim();
        let feedback = feedback.trim();
        if company.is_empty() {
            return Err(FeedbackError::Validation(
                "Company name must not be empty".to_string(),
            ));
        }
        if feedback.is_empty() {
            return Err(FeedbackError::Validation(
                "Feedback text must not be empty".to_string(),
            ));
        }

        let url = format!("{}/classify/", self.base_url);
        tracing::debug!(%url, company, "Submitting feedback");

        let response = self
            .client
            .post(&url)
            .json(&ClassifyRequest { company, feedback })
            .send()
            .await?;

        decode_api(response).await
    }

    /// Reset a company's tallies to zero, returning the new counts
    pub async fn reset_company(&self, company: &str) -> Result<AnalyticsCounts, FeedbackError> {
        let company = NormalizedFilter::new(company);
        if company.is_empty() {
            return Err(FeedbackError::Validation(
                "Company name cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/reset/?company={}",
            self.base_url,
            urlencoding::encode(company.as_str())
        );
        tracing::debug!(%url, "Resetting company analytics");

        let response = self.client.post(&url).send().await?;
        let reset: ResetResponse = decode_api(response).await?;
        tracing::info!("{}", reset.message);

        Ok(reset.data.counts())
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    async fn fetch_analytics(
        &self,
        filter: &NormalizedFilter,
    ) -> Result<AnalyticsCounts, FetchError> {
        AnalyticsClient::fetch_analytics(self, filter).await
    }
}

/// Status codes are not distinguished from transport failures here.
async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Transport(format!("HTTP {}", status)));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn decode_api<T: DeserializeOwned>(response: Response) -> Result<T, FeedbackError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FeedbackError::Api {
            status: status.as_u16(),
            message: error_detail(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| FeedbackError::Fetch(e.into()))
}

/// Pull the service's `detail` message out of an error body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    company: &'a str,
    feedback: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResetResponse {
    message: String,
    data: CompanyAnalytics,
}
