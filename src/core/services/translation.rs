//! Translation Adapter
//!
//! Provider trait for text translation, the DeepL implementation, and the
//! track-level batch driver. Captions are translated in fixed-size batches
//! executed concurrently, serially across batches with a delay, to respect
//! third-party rate limits; a per-caption failure degrades to a placeholder
//! instead of aborting the run.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::{
    captions::{Caption, Track},
    CoreError, CoreResult,
};

use super::ProgressFn;

/// Captions translated concurrently per batch
pub const TRANSLATION_BATCH_SIZE: usize = 3;

/// Delay between consecutive batches
pub const TRANSLATION_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Prefix marking a caption whose translation failed; the original text
/// follows so the user can retry by hand
pub const TRANSLATION_FAILED_PREFIX: &str = "[Translation failed] ";

// =============================================================================
// Provider Trait
// =============================================================================

/// A text translation backend
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Human-readable provider name for logs and error messages
    fn name(&self) -> &str;

    /// Translates a single text into the target language
    async fn translate(&self, text: &str, target_lang: &str) -> CoreResult<String>;
}

// =============================================================================
// DeepL
// =============================================================================

/// DeepL subscription tier; the tiers use different API hosts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeeplPlan {
    Pro,
    Free,
}

impl DeeplPlan {
    fn endpoint(&self) -> &'static str {
        match self {
            Self::Pro => "https://api.deepl.com/v2/translate",
            Self::Free => "https://api-free.deepl.com/v2/translate",
        }
    }
}

/// DeepL translation provider
pub struct DeepLProvider {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Deserialize)]
struct DeeplTranslation {
    text: String,
}

#[derive(Deserialize)]
struct DeeplError {
    #[serde(default)]
    message: Option<String>,
}

impl DeepLProvider {
    pub fn new(api_key: impl Into<String>, plan: DeeplPlan) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: plan.endpoint().to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API endpoint (used by tests against a local server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for DeepLProvider {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn translate(&self, text: &str, target_lang: &str) -> CoreResult<String> {
        let target = target_lang.to_uppercase();
        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .form(&[("text", text), ("target_lang", target.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<DeeplError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("DeepL request failed with status {}", status));
            return Err(CoreError::external_with_status(
                message,
                status.as_u16(),
                Some(status.as_u16().to_string()),
            ));
        }

        let body: DeeplResponse = response.json().await?;
        body.translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| CoreError::external("DeepL returned no translations"))
    }
}

// =============================================================================
// Track Translation
// =============================================================================

/// Translates every caption of a track into `target_lang`, producing a new
/// track with freshly generated caption ids and the same timings.
///
/// Captions are processed in [`TRANSLATION_BATCH_SIZE`] batches; the calls
/// within a batch run concurrently and batches are separated by
/// [`TRANSLATION_BATCH_DELAY`]. A caption whose translation fails keeps its
/// original text behind [`TRANSLATION_FAILED_PREFIX`].
pub async fn translate_track(
    provider: &dyn TranslationProvider,
    source: &Track,
    target_lang: &str,
    progress: Option<ProgressFn<'_>>,
) -> CoreResult<Track> {
    if source.is_empty() {
        return Err(CoreError::ValidationError(
            "Cannot translate an empty track".to_string(),
        ));
    }

    let mut translated = Track::create(
        &format!("AI Translation ({})", target_lang),
        &target_lang.to_lowercase(),
    );
    translated.font_style = source.font_style.clone();

    let sorted = source.sorted_captions();
    let total = sorted.len();
    let mut done = 0usize;

    for (batch_index, batch) in sorted.chunks(TRANSLATION_BATCH_SIZE).enumerate() {
        if batch_index > 0 {
            tokio::time::sleep(TRANSLATION_BATCH_DELAY).await;
        }

        let results = futures::future::join_all(
            batch
                .iter()
                .map(|caption| provider.translate(&caption.text, target_lang)),
        )
        .await;

        for (caption, result) in batch.iter().zip(results) {
            let text = match result {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        caption_id = %caption.id,
                        error = %err,
                        "Caption translation failed; inserting placeholder"
                    );
                    format!("{}{}", TRANSLATION_FAILED_PREFIX, caption.text)
                }
            };
            translated.add_caption(
                Caption::create(translated.id, caption.start, caption.end, &text)
                    .with_language(Some(target_lang.to_lowercase())),
            );
        }

        done += batch.len();
        let percent = (done * 100 / total) as u8;
        if let Some(callback) = progress {
            callback(percent, "Translating captions");
        }
        debug!(done, total, "Translation batch complete");
    }

    Ok(translated)
}

// =============================================================================
// Tests
// =============================================================================
