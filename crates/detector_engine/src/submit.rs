use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use detector_logging::{detector_debug, detector_info};

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/jobs".to_string(),
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Request body posted to the job service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    pub job_description: String,
    pub job_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("job service answered {0}")]
    HttpStatus(u16),
    #[error("job service timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    MalformedResponse(String),
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &JobSubmission) -> Result<SubmissionReceipt, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ReqwestSubmitter {
    pub fn new(settings: &SubmitSettings) -> Result<Self, SubmitError> {
        let endpoint =
            reqwest::Url::parse(&settings.endpoint).map_err(|err| SubmitError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                message: err.to_string(),
            })?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::Network(err.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(&self, submission: &JobSubmission) -> Result<SubmissionReceipt, SubmitError> {
        detector_debug!(
            "posting {} chars for {} to {}",
            submission.job_description.chars().count(),
            submission.job_url,
            self.endpoint
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let receipt: SubmissionReceipt = serde_json::from_slice(&body)
            .map_err(|err| SubmitError::MalformedResponse(err.to_string()))?;
        detector_info!("job service stored submission as {}", receipt.job_id);
        Ok(receipt)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        SubmitError::Timeout
    } else {
        SubmitError::Network(err.to_string())
    }
}
