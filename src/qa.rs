//! Extractive question-answering collaborator.
//!
//! The extractive backend sends `(question, context)` to a hosted
//! span-extraction model and receives the best answer span plus a
//! confidence score. The request/response shapes follow the hosted
//! inference convention for `question-answering` models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::QaConfig;
use crate::error::CollaboratorError;

/// An answer span extracted from supplied context.
#[derive(Debug, Clone)]
pub struct QaAnswer {
    pub answer: String,
    pub confidence: Option<f64>,
}

/// Extractive question-answering service.
#[async_trait]
pub trait ExtractiveQa: Send + Sync {
    /// Extract the best answer span for `question` from `context`.
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer, CollaboratorError>;
}

#[derive(Serialize)]
struct QaRequest<'a> {
    inputs: QaInputs<'a>,
}

#[derive(Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Deserialize)]
struct QaResponse {
    answer: String,
    #[serde(default)]
    score: Option<f64>,
}

/// Client for a hosted extractive-QA endpoint.
///
/// If `QA_API_TOKEN` is present in the environment it is sent as a bearer
/// token; public inference endpoints work without it.
pub struct RemoteQa {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    timeout_secs: u64,
}

impl RemoteQa {
    pub fn new(config: &QaConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: std::env::var("QA_API_TOKEN").ok(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl ExtractiveQa for RemoteQa {
    async fn answer(&self, question: &str, context: &str) -> Result<QaAnswer, CollaboratorError> {
        let body = QaRequest {
            inputs: QaInputs { question, context },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollaboratorError::from_reqwest("qa", self.timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api {
                service: "qa",
                status: status.as_u16(),
                body: body_text,
            });
        }

        let parsed: QaResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed {
                service: "qa",
                detail: e.to_string(),
            })?;

        Ok(QaAnswer {
            answer: parsed.answer,
            confidence: parsed.score,
        })
    }
}
