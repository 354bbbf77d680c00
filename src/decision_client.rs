use crate::config::Config;
use crate::errors::RequestError;
use crate::models::{DecisionResult, HealthStatus, Profile};
use std::future::Future;
use tracing;

/// Anything that can answer a decision query.
///
/// The session controller only depends on this seam, so tests can script
/// responses and timings without a network.
pub trait DecisionService: Send + Sync + 'static {
    /// Issues a single decision query for `profile`. No retries.
    fn submit(
        &self,
        profile: Profile,
    ) -> impl Future<Output = Result<DecisionResult, RequestError>> + Send;
}

/// HTTP client for the remote decision service.
#[derive(Clone)]
pub struct DecisionClient {
    client: reqwest::Client,
    base_url: String,
}

impl DecisionClient {
    /// Creates a new `DecisionClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the decision service, without a trailing slash.
    /// * `timeout` - Optional whole-request timeout. `None` leaves requests unbounded.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            RequestError::LinkFailure(format!("Failed to create decision client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, RequestError> {
        Self::new(config.decision_api_base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the full profile to `POST /predict`.
    ///
    /// # Returns
    ///
    /// * `Result<DecisionResult, RequestError>` - The decoded decision, or
    ///   `ServiceFault` for non-2xx statuses, `LinkFailure` when nothing came
    ///   back, `DecodeFault` for an unreadable body.
    pub async fn predict(&self, profile: &Profile) -> Result<DecisionResult, RequestError> {
        let url = format!("{}/predict", self.base_url);
        tracing::info!(
            "Requesting decision from {} (model={}, loan_amnt={}, income={})",
            url,
            profile.model_choice,
            profile.loan_amnt,
            profile.person_income
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(profile)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Decision request failed: {}", e);
                RequestError::LinkFailure(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Decision service returned {}: {}", status, error_text);
            return Err(RequestError::ServiceFault(status.as_u16()));
        }

        // Read the body first so a dropped connection is not mistaken for a bad payload.
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("Decision response body interrupted: {}", e);
            RequestError::LinkFailure(e.to_string())
        })?;

        let result: DecisionResult = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("Failed to parse decision response: {}", e);
            RequestError::from(e)
        })?;

        tracing::info!(
            "✓ Decision received: {} (p={:.3}, model {})",
            result.prediction,
            result.probability,
            result.model_version
        );
        Ok(result)
    }

    /// Probes `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, RequestError> {
        let url = format!("{}/health", self.base_url);
        tracing::debug!("Probing decision service health: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RequestError::ServiceFault(response.status().as_u16()));
        }

        let status = response.json::<HealthStatus>().await?;
        Ok(status)
    }
}

impl DecisionService for DecisionClient {
    fn submit(
        &self,
        profile: Profile,
    ) -> impl Future<Output = Result<DecisionResult, RequestError>> + Send {
        async move { self.predict(&profile).await }
    }
}
