use crate::audio::wav::AudioData;
use crate::error::{Result, TranscribeError};

/// Trait for speech-to-text recognition.
///
/// This trait allows swapping implementations (remote service vs mock).
pub trait Transcriber: Send + Sync {
    /// Recognize speech in a loaded audio buffer.
    ///
    /// # Errors
    /// * [`TranscribeError::UnrecognizedSpeech`] when no intelligible speech
    ///   was found
    /// * [`TranscribeError::RecognitionService`] when the request itself failed
    fn transcribe(&self, audio: &AudioData) -> Result<String>;

    /// Short name of the backend, for diagnostics
    fn backend_name(&self) -> &str;
}

/// Canned outcome of a [`MockTranscriber`] call.
#[derive(Debug, Clone, PartialEq)]
enum MockOutcome {
    Text(String),
    Unrecognized,
    ServiceFailure(String),
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    backend_name: String,
    outcome: MockOutcome,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(backend_name: &str) -> Self {
        Self {
            backend_name: backend_name.to_string(),
            outcome: MockOutcome::Text("mock transcription".to_string()),
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.outcome = MockOutcome::Text(response.to_string());
        self
    }

    /// Configure the mock to report unintelligible audio
    pub fn with_unrecognized(mut self) -> Self {
        self.outcome = MockOutcome::Unrecognized;
        self
    }

    /// Configure the mock to fail like an unreachable service
    pub fn with_failure(mut self, message: &str) -> Self {
        self.outcome = MockOutcome::ServiceFailure(message.to_string());
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &AudioData) -> Result<String> {
        match &self.outcome {
            MockOutcome::Text(text) => Ok(text.clone()),
            MockOutcome::Unrecognized => Err(TranscribeError::UnrecognizedSpeech),
            MockOutcome::ServiceFailure(message) => Err(TranscribeError::RecognitionService {
                message: message.clone(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
