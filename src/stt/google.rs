//! Remote recognition through the Google Web Speech API (v2).
//!
//! The endpoint takes raw 16-bit PCM in the request body and answers with
//! one JSON object per line. The first object usually carries an empty
//! `result` list; the transcript arrives in a later one.

use crate::audio::wav::AudioData;
use crate::config::RecognizerConfig;
use crate::defaults::SAMPLE_RATE;
use crate::error::{Result, TranscribeError};
use crate::stt::transcriber::Transcriber;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

/// One line of the streaming response.
#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    result: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: Option<String>,
    confidence: Option<f64>,
}

/// Recognizer backed by the Google Web Speech endpoint.
#[derive(Debug)]
pub struct GoogleRecognizer {
    client: reqwest::blocking::Client,
    config: RecognizerConfig,
}

impl GoogleRecognizer {
    /// Build a recognizer with the HTTP client's default timeouts.
    pub fn new(config: RecognizerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("transcribe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranscribeError::RecognitionService {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    /// Full request URL including query parameters.
    pub fn request_url(&self) -> Result<Url> {
        let profanity = if self.config.profanity_filter {
            "1"
        } else {
            "0"
        };
        Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("client", "chromium"),
                ("lang", self.config.language.as_str()),
                ("key", self.config.api_key.as_str()),
                ("pFilter", profanity),
            ],
        )
        .map_err(|e| TranscribeError::RecognitionService {
            message: format!("Invalid recognizer endpoint {:?}: {e}", self.config.endpoint),
        })
    }
}

/// `Content-Type` announcing raw little-endian PCM at the buffer rate.
fn l16_content_type() -> String {
    format!("audio/l16; rate={SAMPLE_RATE}")
}

impl Transcriber for GoogleRecognizer {
    fn transcribe(&self, audio: &AudioData) -> Result<String> {
        if audio.is_empty() {
            return Err(TranscribeError::UnrecognizedSpeech);
        }

        let url = self.request_url()?;
        let body = audio.to_le_bytes();
        log::debug!(
            "Sending {} bytes ({:.2}s) to {}",
            body.len(),
            audio.duration().as_secs_f64(),
            self.config.endpoint
        );

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, l16_content_type())
            .body(body)
            .send()
            .map_err(|e| TranscribeError::RecognitionService {
                message: format!("recognition request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscribeError::RecognitionService {
                message: format!("recognition service returned status {status}"),
            });
        }

        let text = response
            .text()
            .map_err(|e| TranscribeError::RecognitionService {
                message: format!("Failed to read recognition response: {e}"),
            })?;

        parse_response(&text)
    }

    fn backend_name(&self) -> &str {
        "google"
    }
}

/// Extract the transcript from a newline-delimited response body.
///
/// The first line with a non-empty `result` wins. Among its alternatives
/// the one with the highest confidence is chosen, or the first one when
/// none reports a confidence.
pub fn parse_response(body: &str) -> Result<String> {
    let mut chosen: Option<RecognitionResult> = None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let response: RecognizeResponse =
            serde_json::from_str(line).map_err(|e| TranscribeError::RecognitionService {
                message: format!("Failed to parse recognition response: {e}"),
            })?;

        if let Some(result) = response.result.into_iter().next() {
            chosen = Some(result);
            break;
        }
    }

    let result = chosen.ok_or(TranscribeError::UnrecognizedSpeech)?;

    let best = result
        .alternative
        .iter()
        .filter(|a| a.confidence.is_some())
        .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap_or(std::cmp::Ordering::Equal))
        .or_else(|| result.alternative.first());

    best.and_then(|a| a.transcript.clone())
        .ok_or(TranscribeError::UnrecognizedSpeech)
}
