//! Transcription Adapter
//!
//! Provider trait for speech-to-text plus the AssemblyAI implementation
//! (upload, submit, poll). Providers return a full [`Transcript`]; the
//! session converts it into a caption track only after the job resolves.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::core::{captions::Transcript, CoreError, CoreResult};

use super::ProgressFn;

const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_POLLS: usize = 200;

// =============================================================================
// Provider Trait
// =============================================================================

/// A speech-to-text backend
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Human-readable provider name for logs and error messages
    fn name(&self) -> &str;

    /// Transcribes a media file, reporting progress through `progress`
    async fn transcribe(
        &self,
        media: &[u8],
        progress: Option<ProgressFn<'_>>,
    ) -> CoreResult<Transcript>;
}

// =============================================================================
// AssemblyAI
// =============================================================================

/// AssemblyAI transcription provider: upload the media, submit a transcript
/// job, then poll until it completes or errors
pub struct AssemblyAiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    poll_interval: Duration,
    max_polls: usize,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct JobResponse {
    id: String,
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    words: Option<Vec<JobWord>>,
    #[serde(default)]
    utterances: Option<Vec<JobUtterance>>,
}

/// Word timings arrive in milliseconds
#[derive(Deserialize)]
struct JobWord {
    text: String,
    start: i64,
    end: i64,
    #[serde(default)]
    confidence: f64,
}

#[derive(Deserialize)]
struct JobUtterance {
    text: String,
    start: i64,
    end: i64,
}

impl AssemblyAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Overrides the API base URL (used by tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the polling cadence
    pub fn with_polling(mut self, interval: Duration, max_polls: usize) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn upload(&self, media: &[u8]) -> CoreResult<String> {
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(media.to_vec())
            .send()
            .await?;
        let response = check_status(response).await?;
        let upload: UploadResponse = response.json().await?;
        Ok(upload.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> CoreResult<String> {
        let response = self
            .client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&json!({
                "audio_url": audio_url,
                "language_detection": true,
            }))
            .send()
            .await?;
        let response = check_status(response).await?;
        let job: JobResponse = response.json().await?;
        Ok(job.id)
    }

    async fn poll(&self, job_id: &str) -> CoreResult<JobResponse> {
        let response = self
            .client
            .get(format!("{}/transcript/{}", self.base_url, job_id))
            .header("authorization", &self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> CoreResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CoreError::external_with_status(
        format!("AssemblyAI request failed: {}", body),
        status.as_u16(),
        None,
    ))
}

fn report(progress: Option<ProgressFn<'_>>, percent: u8, phase: &str) {
    if let Some(callback) = progress {
        callback(percent, phase);
    }
}

const MS_PER_SEC: f64 = 1000.0;

impl JobResponse {
    fn into_transcript(self) -> Transcript {
        Transcript {
            text: self.text.unwrap_or_default(),
            words: self
                .words
                .unwrap_or_default()
                .into_iter()
                .map(|w| crate::core::captions::TranscriptWord {
                    text: w.text,
                    start: w.start as f64 / MS_PER_SEC,
                    end: w.end as f64 / MS_PER_SEC,
                    confidence: w.confidence,
                })
                .collect(),
            utterances: self
                .utterances
                .unwrap_or_default()
                .into_iter()
                .map(|u| crate::core::captions::TranscriptUtterance {
                    text: u.text,
                    start: u.start as f64 / MS_PER_SEC,
                    end: u.end as f64 / MS_PER_SEC,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiProvider {
    fn name(&self) -> &str {
        "AssemblyAI"
    }

    async fn transcribe(
        &self,
        media: &[u8],
        progress: Option<ProgressFn<'_>>,
    ) -> CoreResult<Transcript> {
        report(progress, 10, "Uploading media");
        let audio_url = self.upload(media).await?;
        debug!(%audio_url, "Media uploaded");

        report(progress, 40, "Submitting transcription job");
        let job_id = self.submit(&audio_url).await?;
        debug!(%job_id, "Transcription job submitted");

        for attempt in 0..self.max_polls {
            tokio::time::sleep(self.poll_interval).await;
            let job = self.poll(&job_id).await?;
            match job.status.as_str() {
                "completed" => {
                    report(progress, 100, "Transcription complete");
                    return Ok(job.into_transcript());
                }
                "error" => {
                    return Err(CoreError::external(format!(
                        "Transcription failed: {}",
                        job.error.unwrap_or_else(|| "unknown error".to_string())
                    )));
                }
                status => {
                    // queued / processing
                    let percent = 40 + (55 * attempt / self.max_polls) as u8;
                    report(progress, percent.min(95), "Transcribing");
                    debug!(%job_id, %status, attempt, "Transcription in progress");
                }
            }
        }

        Err(CoreError::external(
            "Transcription timed out waiting for the job to complete",
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
